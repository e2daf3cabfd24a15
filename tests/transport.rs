use multiline_console::console::{Channel, MemoryConsole, Output};
use multiline_console::format::{FormatError, Json};
use multiline_console::record::{LineRecord, LogRecord};
use multiline_console::{MultiLineConsole, TransportConfig, TransportOptions};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::time::{timeout, Duration};

fn options(value: serde_json::Value) -> TransportOptions {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn logged_is_emitted_after_submit_returns() {
    let console = MemoryConsole::new();
    let transport = MultiLineConsole::new(TransportConfig::new().console(console.clone())).unwrap();

    let record = Arc::new(LogRecord::new("warn", "oh noes!"));
    transport.submit(Arc::clone(&record), |_, _| {}).unwrap();

    // Subscribed after the call and still notified.
    let mut rx = transport.subscribe();
    let seen = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&seen, &record));
    assert!(rx.try_recv().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn late_listener_is_notified_on_multi_thread_runtime() {
    let transport = MultiLineConsole::new(TransportConfig::new().console(MemoryConsole::new())).unwrap();

    for _ in 0..20 {
        let record = Arc::new(LogRecord::new("info", "racy"));
        transport.submit(Arc::clone(&record), |_, _| {}).unwrap();

        // Still inside the calling code; workers are free to run meanwhile.
        std::thread::sleep(Duration::from_millis(2));

        let mut rx = transport.subscribe();
        let seen = timeout(Duration::from_millis(50), rx.recv()).await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&seen, &record));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn burst_yields_one_notification_per_record() {
    let transport = MultiLineConsole::new(
        TransportConfig::new()
            .console(MemoryConsole::new())
            .notify_capacity(8),
    )
    .unwrap();
    let mut rx = transport.subscribe();

    for n in 0..200u64 {
        transport.submit(LogRecord::new("info", n), |_, _| {}).unwrap();
    }

    let mut seen = Vec::new();
    while seen.len() < 200 {
        let record = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
        seen.push(record.message.clone().unwrap());
    }
    assert_eq!(seen, (0..200u64).map(|n| json!(n)).collect::<Vec<_>>());
    assert!(rx.try_recv().is_none());
}

#[tokio::test]
async fn recv_ends_when_transport_is_dropped() {
    let transport = MultiLineConsole::new(TransportConfig::new().console(MemoryConsole::new())).unwrap();
    let mut rx = transport.subscribe();
    transport.submit(LogRecord::new("info", "last"), |_, _| {}).unwrap();
    drop(transport);

    assert_eq!(rx.recv().await.unwrap().message, Some(json!("last")));
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn one_notification_per_record() {
    let transport = MultiLineConsole::new(TransportConfig::new().console(MemoryConsole::new())).unwrap();
    let mut rx = transport.subscribe();

    transport.submit(LogRecord::new("info", "a\nb\nc"), |_, _| {}).unwrap();
    transport.submit(LogRecord::new("info", "d"), |_, _| {}).unwrap();

    let first = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
    let second = timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
    assert_eq!(first.message, Some(json!("a\nb\nc")));
    assert_eq!(second.message, Some(json!("d")));
}

#[test]
fn configured_from_options() {
    let console = MemoryConsole::new();
    let config = TransportConfig::from_options(options(json!({
        "stderrLevels": ["error", "crit"],
        "eol": "\r\n",
        "name": "split-console",
        "level": "debug"
    })))
    .console(console.clone());
    let transport = MultiLineConsole::new(config).unwrap();
    assert_eq!(transport.name(), "split-console");

    transport
        .submit(LogRecord::new("crit", "disk\r\nfull"), |_, _| {})
        .unwrap();

    assert_eq!(
        console.outputs(),
        vec![
            Output::Write(Channel::Stderr, "disk\r\n".to_string()),
            Output::Write(Channel::Stderr, "full\r\n".to_string()),
        ]
    );
}

#[test]
fn invalid_stderr_levels_from_options() {
    for bad in [json!("foo"), json!([null]), json!(["error", {}])] {
        let config = TransportConfig::from_options(options(json!({ "stderrLevels": bad })));
        let err = MultiLineConsole::new(config).err().unwrap();
        assert_eq!(
            err.to_string(),
            "Cannot make set from type other than Array of string elements."
        );
    }
}

#[test]
fn omitted_stderr_levels_route_everything_to_stdout() {
    let console = MemoryConsole::new();
    let transport = MultiLineConsole::new(TransportConfig::new().console(console.clone()).eol("\n")).unwrap();

    for level in ["error", "warn", "info"] {
        transport.submit(LogRecord::new(level, level), |_, _| {}).unwrap();
    }

    assert_eq!(console.texts(Channel::Stdout), vec!["error\n", "warn\n", "info\n"]);
    assert!(console.texts(Channel::Stderr).is_empty());
}

#[test]
fn splat_and_missing_message() {
    let console = MemoryConsole::with_raw_streams(false, false);
    let transport = MultiLineConsole::new(TransportConfig::new().console(console.clone()).eol("\n")).unwrap();

    transport
        .submit(
            LogRecord::without_message("info").with_splat([json!("  indented"), json!("\n"), json!(42)]),
            |_, _| {},
        )
        .unwrap();
    transport.submit(LogRecord::without_message("info"), |_, _| {}).unwrap();

    assert_eq!(
        console.outputs(),
        vec![
            Output::Log(Channel::Stdout, "indented".to_string()),
            Output::Log(Channel::Stdout, "42".to_string()),
            Output::Log(Channel::Stdout, String::new()),
        ]
    );
}

#[test]
fn formatter_sees_one_fresh_record_per_line() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_format = Arc::clone(&seen);
    let recording = move |record: LineRecord| -> Result<LineRecord, FormatError> {
        seen_by_format.lock().unwrap().push(record.clone());
        Ok(record)
    };
    let transport = MultiLineConsole::new(
        TransportConfig::new()
            .console(MemoryConsole::new())
            .format(recording)
            .eol("\n"),
    )
    .unwrap();

    transport
        .submit(LogRecord::new("info", "x\ny").with_splat([json!("z")]), |_, _| {})
        .unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![LineRecord::new("info", "x"), LineRecord::new("info", "yz")]
    );
}

#[test]
fn json_lines() {
    let console = MemoryConsole::new();
    let transport = MultiLineConsole::new(
        TransportConfig::new()
            .console(console.clone())
            .format(Json)
            .stderr_levels(["error"])
            .eol("\n"),
    )
    .unwrap();

    transport.submit(LogRecord::new("error", "a\nb"), |_, _| {}).unwrap();

    assert_eq!(
        console.texts(Channel::Stderr),
        vec![
            "{\"level\":\"error\",\"message\":\"a\"}\n",
            "{\"level\":\"error\",\"message\":\"b\"}\n",
        ]
    );
}
