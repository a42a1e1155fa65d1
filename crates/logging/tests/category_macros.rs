use logging::{DebugFlag, LogConfig, ShimLayer, drain_events, trace_acl, trace_ffi, trace_stat};
use tracing_subscriber::layer::SubscriberExt;

fn capture(config: &LogConfig, body: impl FnOnce()) -> Vec<logging::DiagnosticEvent> {
    drain_events();
    let subscriber = tracing_subscriber::registry().with(ShimLayer::new(config));
    tracing::subscriber::with_default(subscriber, body);
    drain_events()
}

#[test]
fn macros_route_to_their_category() {
    let events = capture(&LogConfig::all(1), || {
        trace_acl!(path = "/tmp/x", "acl_to_text");
        trace_stat!("lstat");
        trace_ffi!(export = "linux_lstat", "entered");
    });

    let flags: Vec<DebugFlag> = events.iter().map(|event| event.flag).collect();
    assert_eq!(flags, [DebugFlag::Acl, DebugFlag::Stat, DebugFlag::Ffi]);
    assert_eq!(events[0].message, "acl_to_text path=\"/tmp/x\"");
    assert_eq!(events[2].message, "entered export=\"linux_lstat\"");
}

#[test]
fn silent_config_records_nothing() {
    let events = capture(&LogConfig::parse(None), || {
        trace_acl!("ignored");
        tracing::trace!(target: logging::TARGET_ACL, "ignored too");
    });
    assert!(events.is_empty());
}

#[test]
fn level_two_adds_trace_detail() {
    let events = capture(&LogConfig::parse(Some("acl2")), || {
        trace_acl!("summary");
        tracing::trace!(target: logging::TARGET_ACL, "detail");
        trace_stat!("other category");
    });
    let levels: Vec<u8> = events.iter().map(|event| event.level).collect();
    assert_eq!(levels, [1, 2]);
}

#[test]
fn init_tracing_tolerates_existing_subscriber() {
    let first = logging::init_tracing(&LogConfig::parse(None));
    let second = logging::init_tracing(&LogConfig::all(1));
    assert!(first);
    assert!(!second);
}
