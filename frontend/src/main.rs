fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        use log::{info, Level};

        // Initialize console error panic hook for better error messages
        console_error_panic_hook::set_once();

        // Initialize logging
        console_log::init_with_level(Level::Info).expect("error initializing log");

        info!("Starting landing runtime");
        landing::web::start();
    }
}
