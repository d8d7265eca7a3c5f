use brickwall_frontend::App;
use leptos::prelude::*;

// WASM 下使用 lol_alloc 以减小体积
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();
    brickwall::log_info!("[App] Mounting Brickwall Academy");
    mount_to_body(App);
}
