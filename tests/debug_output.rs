mod common;

use std::io::Write;
use std::sync::{Arc, Mutex};

use bouncer::logging;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn take(&self) -> String {
        String::from_utf8(std::mem::take(&mut *self.0.lock().unwrap())).unwrap()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_debug_control_raises_verbosity() {
    let capture = Capture::default();
    let writer = capture.clone();
    let (subscriber, switch) = logging::subscriber(logging::base_level(0), move || writer.clone());

    tracing::subscriber::with_default(subscriber, || {
        let h = common::harness();
        let mut device = h.device.with_debug_switch(switch);

        device.update("aa:bb:cc;*;active").unwrap();
        assert_eq!(capture.take(), "");

        assert!(device.set_debug("1"));
        device.update("aa:bb:cc;*;active").unwrap();
        let out = capture.take();
        assert!(out.contains("Active? yes"), "{out}");
        assert!(out.contains("Key found"), "{out}");

        assert!(!device.set_debug("0"));
        device.update("aa:bb:cc;*;active,lost").unwrap();
        assert_eq!(capture.take(), "");
    });
}

#[test]
fn test_base_levels() {
    assert_eq!(logging::base_level(0), "warn");
    assert_eq!(logging::base_level(1), "info");
    assert_eq!(logging::base_level(2), "debug");
    assert_eq!(logging::base_level(9), "trace");
}
