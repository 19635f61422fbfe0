use crate::config::OrnamentConfig;
use crate::input::camera::screen_to_ndc;
use crate::input::requests::{spawn_channel, SpawnRequest, SpawnRequestSender};
use crate::motion::{MotionConfig, MotionDetector, SyntheticCamera};
use crate::scene::{OrnamentScene, Scene};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;
const FRAME_TIME: Duration = Duration::from_micros(16_667);
const CAPTURE_INTERVAL: Duration = Duration::from_millis(33);
const DEMO_FRAMES: u32 = 600;

/// Input from the host window, in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    PointerMoved { x: f32, y: f32 },
    PointerLeft,
    Click { x: f32, y: f32 },
    Resized { width: u32, height: u32 },
    CloseRequested,
}

pub struct App {
    scene: OrnamentScene,
    requests: SpawnRequestSender,
    width: u32,
    height: u32,
    last_render_time: Instant,
    frame_count: u32,
    fps_timer: Instant,
}

impl App {
    pub fn new(scene: OrnamentScene, requests: SpawnRequestSender, width: u32, height: u32) -> Self {
        Self {
            scene,
            requests,
            width,
            height,
            last_render_time: Instant::now(),
            frame_count: 0,
            fps_timer: Instant::now(),
        }
    }

    pub fn scene(&self) -> &OrnamentScene {
        &self.scene
    }

    /// Returns `false` when the app should exit.
    pub fn handle_event(&mut self, event: &AppEvent) -> bool {
        match *event {
            AppEvent::CloseRequested => {
                log::info!("Close requested");
                return false;
            }
            AppEvent::Resized { width, height } => {
                self.width = width;
                self.height = height;
                let mut camera = *self.scene.camera();
                camera.set_aspect(width as f32, height as f32);
                self.scene.set_camera(camera);
            }
            AppEvent::PointerMoved { x, y } => {
                let ndc = screen_to_ndc(x, y, self.width as f32, self.height as f32);
                self.scene.set_pointer(Some(ndc));
            }
            AppEvent::PointerLeft => {
                self.scene.set_pointer(None);
            }
            AppEvent::Click { x, y } => {
                let ndc = screen_to_ndc(x, y, self.width as f32, self.height as f32);
                self.requests.send(SpawnRequest::Click(ndc));
            }
        }
        true
    }

    pub fn render(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_render_time).as_secs_f32();
        self.last_render_time = now;

        self.scene.update(dt);

        // FPS counter
        self.frame_count += 1;
        if self.fps_timer.elapsed().as_secs_f32() >= 1.0 {
            log::info!(
                "FPS: {}, live particles: {} ({} on the tree)",
                self.frame_count,
                self.scene.live_particles(),
                self.scene.stuck_particles()
            );
            self.frame_count = 0;
            self.fps_timer = Instant::now();
        }
    }
}

/// Capture domain: polls the detector on its own thread until stopped
pub struct CaptureWorker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl CaptureWorker {
    pub fn spawn(config: MotionConfig, requests: SpawnRequestSender) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = std::thread::Builder::new()
            .name("motion-capture".to_string())
            .spawn(move || {
                let mut camera = SyntheticCamera::new(640, 480);
                let mut detector = MotionDetector::new(config, requests);
                if detector.enable(&mut camera).is_err() {
                    return;
                }

                while !stop_flag.load(Ordering::SeqCst) {
                    if detector.poll().is_err() {
                        break;
                    }
                    std::thread::sleep(CAPTURE_INTERVAL);
                }
                detector.disable();
            })?;

        Ok(Self { stop, handle })
    }

    /// Disable detection, release the camera and wait for the thread
    pub fn stop(self) {
        self.stop.store(true, Ordering::SeqCst);
        if self.handle.join().is_err() {
            log::error!("Motion capture thread panicked");
        }
    }
}

/// Scripted pointer input for the headless run: a slow circle with a click
/// every second and a half.
fn demo_events(frame: u32) -> Vec<AppEvent> {
    let angle = frame as f32 * 0.03;
    let (cx, cy) = (WINDOW_WIDTH as f32 * 0.5, WINDOW_HEIGHT as f32 * 0.5);
    let mut events = vec![AppEvent::PointerMoved {
        x: cx + angle.cos() * 200.0,
        y: cy + angle.sin() * 150.0,
    }];
    if frame % 90 == 45 {
        events.push(AppEvent::Click { x: cx, y: cy });
    }
    if frame + 1 == DEMO_FRAMES {
        events.push(AppEvent::PointerLeft);
        events.push(AppEvent::CloseRequested);
    }
    events
}

pub fn run() {
    env_logger::init();

    let config = OrnamentConfig::load();
    let (tx, rx) = spawn_channel();
    let aspect = WINDOW_WIDTH as f32 / WINDOW_HEIGHT as f32;
    let scene = OrnamentScene::new(&config, aspect, rx);

    let capture = match CaptureWorker::spawn(config.motion.clone(), tx.clone()) {
        Ok(worker) => Some(worker),
        Err(e) => {
            log::error!("Failed to start motion capture thread: {}", e);
            None
        }
    };

    let mut app = App::new(scene, tx, WINDOW_WIDTH, WINDOW_HEIGHT);
    'frames: for frame in 0..DEMO_FRAMES {
        let started = Instant::now();
        for event in demo_events(frame) {
            if !app.handle_event(&event) {
                break 'frames;
            }
        }
        app.render();

        if let Some(remaining) = FRAME_TIME.checked_sub(started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    if let Some(worker) = capture {
        worker.stop();
    }
    log::info!(
        "Finished after {:.1}s with {} live particles",
        app.scene().current_time(),
        app.scene().live_particles()
    );
}
