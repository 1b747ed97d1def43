//! Manual-entry kiosk adapter.
//!
//! Drives one [`VisitorSession`] from stdin: tickets are typed instead of
//! scanned, and the session state decides what the next line of input
//! means. Camera-driven kiosks are the same adapter with a QR decoder in
//! front.

use std::io::{BufRead, Write};

use common::config::Config;
use common::logger::init_logger;
use gateway::HttpVisitorLogGateway;
use kiosk::{SessionState, SignOutOutcome, TargetDepartment, VisitorSession};

#[derive(Clone, Copy)]
enum Step {
    Idle,
    RecordVisit,
    ConfirmTransfer,
    SignOut,
}

#[tokio::main]
async fn main() {
    let config = Config::init(".env");
    init_logger(&config.log_level, &config.log_file);

    let gateway = match HttpVisitorLogGateway::from_config() {
        Ok(gateway) => gateway,
        Err(err) => {
            eprintln!("Could not set up the visitor-log client: {err}");
            std::process::exit(1);
        }
    };

    let target = TargetDepartment {
        department_id: config.kiosk_department_id,
        office_id: config.kiosk_office_id,
        name: config.kiosk_department_name.clone(),
    };
    let mut session = VisitorSession::new(gateway, target, config.kiosk_user_id);

    println!(
        "{}: {} desk (office {})",
        config.project_name, config.kiosk_department_name, config.kiosk_office_id
    );

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let step = match session.state() {
            SessionState::Idle => Step::Idle,
            SessionState::RecordVisit { .. } => Step::RecordVisit,
            SessionState::ConfirmTransfer { .. } => Step::ConfirmTransfer,
            SessionState::SignOut { .. } => Step::SignOut,
        };

        let prompt = match step {
            Step::Idle => "Ticket code",
            Step::RecordVisit => "Purpose of visit",
            Step::ConfirmTransfer => "Visitor is signed into another office. Transfer here? [y/n]",
            Step::SignOut => "Sign visitor out of this department? [y/n]",
        };
        print!("{prompt}: ");
        std::io::stdout().flush().ok();

        let input = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };
        let input = input.trim();

        let outcome = match step {
            Step::Idle => session.submit_scan(input).await.map(|state| match state {
                SessionState::SignOut { .. } => "Visitor has an active department visit.",
                SessionState::ConfirmTransfer { .. } => "",
                _ => "Visitor found.",
            }),
            Step::RecordVisit => session
                .submit_visit_purpose(input)
                .await
                .map(|_| "Visit recorded."),
            Step::ConfirmTransfer => {
                let accept = input.eq_ignore_ascii_case("y");
                session.confirm_transfer(accept).await.map(|_| {
                    if accept {
                        "Visitor transferred."
                    } else {
                        "Transfer cancelled."
                    }
                })
            }
            Step::SignOut => {
                if input.eq_ignore_ascii_case("y") {
                    session.confirm_sign_out().await.map(|outcome| match outcome {
                        SignOutOutcome::SignedOut => "Visitor signed out.",
                        SignOutOutcome::AlreadyClosed => "Visitor Already Logged Out",
                    })
                } else {
                    Ok("Waiting for confirmation.")
                }
            }
        };

        match outcome {
            Ok(message) if !message.is_empty() => println!("{message}"),
            Ok(_) => {}
            Err(err) => println!("{err}"),
        }
    }
}
