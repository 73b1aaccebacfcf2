//! A thin UCI binary wrapping `garbochess_core`. Not part of the core
//! itself; see `src/uci.rs` for the command loop.

fn main() {
    garbochess_core::uci::run_uci_loop();
}
