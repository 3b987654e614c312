use anyhow::{Result, bail};
use colored::Colorize;
use marketpulse_application::PasswordResetFlow;

pub fn run(email: &str) -> Result<()> {
    let mut flow = PasswordResetFlow::new();
    if let Err(errors) = flow.submit(email) {
        for error in &errors {
            eprintln!("{}", format!("{}: {}", error.field, error.message).red());
        }
        bail!("Please enter a valid email address");
    }

    if let Some(message) = flow.confirmation_message() {
        println!("{}", message.green());
    }
    Ok(())
}
