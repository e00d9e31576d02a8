use std::sync::Once;

pub fn setup() {
    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        let _ = env_logger::builder()
            .parse_filters("mocktransport=trace")
            .is_test(true)
            .try_init();
    });
}
