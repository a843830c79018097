//! Integration tests for command-line parsing across the full input matrix.
//!
//! Every row here is a line the parent process could realistically send;
//! the dispatcher's behavior contract depends on each one landing in the
//! right [`ParseError`] class.

use portway_core::BaudRate;
use portway_protocol::{Command, ParseError};
use rstest::rstest;

#[rstest]
#[case(r#"{"CMD":"LIST"}"#, Command::List)]
#[case(r#"{"CMD":"CLOSE"}"#, Command::Close)]
#[case(r#"{"CMD":"LIST","EXTRA":"ignored"}"#, Command::List)]
fn parses_argumentless_commands(#[case] line: &str, #[case] expected: Command) {
    assert_eq!(Command::parse_line(line).unwrap(), expected);
}

#[rstest]
#[case(r#"{"CMD":"OPEN","PORT":"/dev/ttyUSB0","BAUD":115200}"#, "/dev/ttyUSB0", 115_200)]
#[case(r#"{"CMD":"OPEN","PORT":"/dev/ttyUSB0","BAUD":"115200"}"#, "/dev/ttyUSB0", 115_200)]
#[case(r#"{"CMD":"OPEN","PORT":"COM3","BAUD":"  9600 "}"#, "COM3", 9600)]
#[case(r#"{"CMD":"OPEN","PORT":"","BAUD":9600}"#, "", 9600)]
fn parses_open_with_flexible_baud(#[case] line: &str, #[case] port: &str, #[case] baud: u32) {
    // An empty PORT parses; rejecting it is the dispatcher's precondition.
    assert_eq!(
        Command::parse_line(line).unwrap(),
        Command::Open {
            port: port.to_string(),
            baud: BaudRate::new(baud).unwrap(),
        }
    );
}

#[rstest]
#[case(r#"{"CMD":"OPEN","PORT":"COM3","BAUD":0}"#)]
#[case(r#"{"CMD":"OPEN","PORT":"COM3","BAUD":"0"}"#)]
#[case(r#"{"CMD":"OPEN","PORT":"COM3","BAUD":-9600}"#)]
#[case(r#"{"CMD":"OPEN","PORT":"COM3","BAUD":"fast"}"#)]
#[case(r#"{"CMD":"OPEN","PORT":"COM3","BAUD":4294967296}"#)]
#[case(r#"{"CMD":"OPEN","PORT":"COM3","BAUD":null}"#)]
#[case(r#"{"CMD":"OPEN","PORT":"COM3"}"#)]
#[case(r#"{"CMD":"OPEN","BAUD":9600}"#)]
#[case(r#"{"CMD":"OPEN","PORT":3,"BAUD":9600}"#)]
fn rejects_open_with_bad_arguments(#[case] line: &str) {
    let err = Command::parse_line(line).unwrap_err();
    assert!(
        matches!(err, ParseError::InvalidArguments { command: "OPEN", .. }),
        "expected InvalidArguments, got {err:?}"
    );
}

#[rstest]
#[case(r#"{"CMD":"WRITE","DATA":"48656c6c6f"}"#, "48656c6c6f")]
#[case(r#"{"CMD":"WRITE","DATA":""}"#, "")]
#[case(r#"{"CMD":"WRITE","DATA":"zz"}"#, "zz")]
fn parses_write_payload_verbatim(#[case] line: &str, #[case] data: &str) {
    // DATA is carried through as text; hex validation happens at write time.
    assert_eq!(
        Command::parse_line(line).unwrap(),
        Command::Write {
            data: data.to_string(),
        }
    );
}

#[rstest]
#[case(r#"{"CMD":"REBOOT"}"#, "REBOOT")]
#[case(r#"{"CMD":"open"}"#, "open")]
#[case(r#"{"CMD":""}"#, "")]
fn unknown_tags_are_alerts_not_diagnostics(#[case] line: &str, #[case] tag: &str) {
    // Command tags are case-sensitive: "open" is not OPEN.
    let err = Command::parse_line(line).unwrap_err();
    match err {
        ParseError::UnknownCommand(found) => assert_eq!(found, tag),
        other => panic!("expected UnknownCommand, got {other:?}"),
    }
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("not json at all")]
#[case(r#"{"CMD":"LIST""#)]
#[case("[1,2,3]")]
#[case("\"LIST\"")]
#[case("null")]
#[case(r#"{"cmd":"LIST"}"#)]
#[case(r#"{"CMD":null}"#)]
fn malformed_lines_never_become_events(#[case] line: &str) {
    let err = Command::parse_line(line).unwrap_err();
    assert!(err.is_malformed(), "expected malformed classification for {line:?}, got {err:?}");
}
