use multiline_console::config::{EOL_ENV, NAME_ENV, STDERR_LEVELS_ENV};
use multiline_console::console::{Channel, MemoryConsole};
use multiline_console::record::LogRecord;
use multiline_console::{MultiLineConsole, TransportConfig};

// Single test in this binary: it owns the process environment.
#[test]
fn transport_from_environment() {
    std::env::set_var(STDERR_LEVELS_ENV, "error, warn");
    std::env::set_var(EOL_ENV, "\\r\\n");
    std::env::set_var(NAME_ENV, "env-console");

    let console = MemoryConsole::new();
    let transport = MultiLineConsole::new(TransportConfig::from_env().console(console.clone())).unwrap();

    assert_eq!(transport.name(), "env-console");
    assert_eq!(transport.eol(), "\r\n");
    assert!(transport.stderr_levels().contains("warn"));

    transport.submit(LogRecord::new("warn", "a\r\nb"), |_, _| {}).unwrap();
    transport.submit(LogRecord::new("info", "c"), |_, _| {}).unwrap();

    assert_eq!(console.texts(Channel::Stderr), vec!["a\r\n", "b\r\n"]);
    assert_eq!(console.texts(Channel::Stdout), vec!["c\r\n"]);
}
