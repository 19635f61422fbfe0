//! # Tree Ornament
//!
//! Headless run of the interactive ornament: a scripted pointer circles the
//! tree, clicks fire bursts, and a synthetic camera feeds the motion detector
//! on its own thread. Set `RUST_LOG=info` to see the per-second summary.

fn main() {
    tree_ornament::app::run();
}
