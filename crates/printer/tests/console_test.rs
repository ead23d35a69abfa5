//! End-to-end tests for the process-wide printer
//!
//! These tests share the global printer, so they run serially and each one
//! resets the connection before its listener goes away.

use printer::{Config, Printer, console_debug_print, console_dump, console_print};
use printer_listener::{ConsoleEvent, ConsoleListener, ListenerConfig};
use serial_test::serial;
use std::net::{SocketAddr, TcpListener};
use std::thread;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio::sync::broadcast;
use tokio::time::timeout;
use tracing_test::traced_test;
use uuid::Uuid;

/// A console listener on its own runtime, with the global printer pointed at
/// it.
struct Console {
    runtime: Runtime,
    listener: ConsoleListener,
    events: broadcast::Receiver<ConsoleEvent>,
}

impl Console {
    fn start() -> Self {
        let runtime = Runtime::new().expect("Failed to build runtime");
        let listener = ConsoleListener::new(ListenerConfig {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            ..ListenerConfig::default()
        });
        let events = listener.subscribe();
        let addr = runtime
            .block_on(listener.start())
            .expect("Failed to start listener");

        printer::reset();
        printer::configure(Config::builder().host("127.0.0.1").port(addr.port()).build());

        Self {
            runtime,
            listener,
            events,
        }
    }

    fn next_event(&mut self) -> ConsoleEvent {
        let events = &mut self.events;
        self.runtime
            .block_on(async { timeout(Duration::from_secs(5), events.recv()).await })
            .expect("Event timeout")
            .expect("Event channel closed")
    }

    fn expect_connected(&mut self) -> Uuid {
        match self.next_event() {
            ConsoleEvent::Connected { connection } => connection,
            event => panic!("expected a connect event, got {event:?}"),
        }
    }

    fn expect_frames(&mut self, connection: Uuid, frames: &[&str]) {
        for expected in frames {
            assert_eq!(
                self.next_event(),
                ConsoleEvent::Text {
                    connection,
                    text: (*expected).to_string(),
                }
            );
        }
    }

    fn expect_going_away(&mut self, connection: Uuid) {
        assert_eq!(
            self.next_event(),
            ConsoleEvent::Closed {
                connection,
                code: Some(1001),
            }
        );
    }

    fn finish(self) {
        self.runtime.block_on(self.listener.shutdown());
    }
}

#[test]
#[serial]
#[traced_test]
fn test_print_reaches_console() {
    let mut console = Console::start();

    console_print!("a", "b"; separator = ".");

    let connection = console.expect_connected();
    console.expect_frames(connection, &["", "a", ".", "b", "\n"]);

    printer::reset();
    console.expect_going_away(connection);

    console.finish();
}

#[test]
#[serial]
fn test_print_options() {
    let mut console = Console::start();

    console_print!(1, 2, 3);
    console_print!("x"; terminator = ".\n");
    console_print!();

    let connection = console.expect_connected();
    console.expect_frames(
        connection,
        &["", "1", " ", "2", " ", "3", "\n", "", "x", ".\n", "\n"],
    );

    printer::reset();
    console.expect_going_away(connection);

    console.finish();
}

#[test]
#[serial]
fn test_debug_print_and_dump() {
    let mut console = Console::start();

    console_debug_print!("quoted", Some(1); separator = ", ");
    let value = console_dump!(vec![1, 2]; name = "list");
    assert_eq!(value, vec![1, 2]);

    let connection = console.expect_connected();
    console.expect_frames(
        connection,
        &[
            "",
            "\"quoted\"",
            ", ",
            "Some(1)",
            "\n",
            "- list: [\n",
            "      1,\n",
            "      2,\n",
            "  ]\n",
        ],
    );

    printer::reset();
    console.expect_going_away(connection);

    console.finish();
}

#[test]
#[serial]
#[traced_test]
fn test_reset_provisions_new_connection() {
    let mut console = Console::start();

    console_print!("one");
    let first = console.expect_connected();
    console.expect_frames(first, &["", "one", "\n"]);

    printer::reset();
    printer::reset();
    console.expect_going_away(first);

    console_print!("two");
    let second = console.expect_connected();
    assert_ne!(first, second);
    console.expect_frames(second, &["", "two", "\n"]);

    printer::reset();
    console.expect_going_away(second);

    console.finish();
}

#[test]
#[serial]
fn test_settings_apply_to_next_connection() {
    let mut console = Console::start();
    let port = printer::port();
    assert_eq!(printer::host(), "127.0.0.1");

    console_print!("first");
    let connection = console.expect_connected();
    console.expect_frames(connection, &["", "first", "\n"]);

    // Not applied to the open connection.
    printer::set_host("not a host");
    console_print!("still delivered");
    console.expect_frames(connection, &["", "still delivered", "\n"]);

    printer::set_host("127.0.0.1");
    printer::set_port(port);
    printer::reset();
    console.expect_going_away(connection);

    console.finish();
}

#[test]
#[serial]
fn test_concurrent_prints_do_not_interleave() {
    const THREADS: usize = 4;
    const PRINTS: usize = 25;

    let mut console = Console::start();

    let handles = (0..THREADS)
        .map(|thread| {
            thread::spawn(move || {
                let name = format!("t{thread}");
                for _ in 0..PRINTS {
                    console_print!(name, "x", "y");
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().expect("Printer thread panicked");
    }

    let connection = console.expect_connected();
    for _ in 0..THREADS * PRINTS {
        let frames = (0..7)
            .map(|_| match console.next_event() {
                ConsoleEvent::Text { connection: c, text } if c == connection => text,
                event => panic!("unexpected event {event:?}"),
            })
            .collect::<Vec<_>>();

        assert_eq!(frames[0], "");
        assert!(frames[1].starts_with('t'), "frames out of order: {frames:?}");
        assert_eq!(frames[2..], [" ", "x", " ", "y", "\n"]);
    }

    printer::reset();
    console.expect_going_away(connection);

    console.finish();
}

#[test]
#[serial]
fn test_invalid_host_is_silent() {
    printer::reset();
    printer::configure(Config::builder().host("not a host").build());

    let started = Instant::now();
    for _ in 0..100 {
        console_print!("lost");
        console_debug_print!("lost");
        printer::reset();
    }
    assert!(started.elapsed() < Duration::from_secs(1));

    printer::configure(Config::default());
}

#[test]
fn test_unreachable_endpoint_never_blocks() {
    let port = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind")
        .local_addr()
        .expect("Failed to read address")
        .port();
    let printer = Printer::new(Config::builder().host("127.0.0.1").port(port).build());

    let started = Instant::now();
    for _ in 0..100 {
        printer.print(&[&"lost"], &printer::PrintOptions::default());
    }
    assert!(started.elapsed() < Duration::from_secs(1));

    printer.reset();
}
