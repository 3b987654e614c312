use anyhow::{Context, Result, bail};
use colored::Colorize;
use marketpulse_application::AuthOutcome;
use marketpulse_core::session::SessionState;

use super::context::AppContext;

pub async fn login(context: &AppContext, email: &str, password: Option<String>) -> Result<()> {
    let password = read_password(password)?;
    let outcome = context.session.login(email, &password).await;
    report(outcome)
}

pub async fn signup(
    context: &AppContext,
    name: &str,
    email: &str,
    dob: &str,
    password: Option<String>,
) -> Result<()> {
    let password = read_password(password)?;
    let outcome = context.session.signup(name, email, &password, dob).await;
    report(outcome)
}

pub fn logout(context: &AppContext) -> Result<()> {
    let was_signed_in = context.session.is_authenticated();
    context.session.logout();
    if was_signed_in {
        println!("{}", "Signed out".green());
    } else {
        println!("Not signed in");
    }
    Ok(())
}

pub fn whoami(context: &AppContext) -> Result<()> {
    let session = context.session.session();
    if !session.is_authenticated() {
        println!("Not signed in");
        return Ok(());
    }
    print_profile(&session);
    println!(
        "{}",
        format!("Auth service: {}", context.config.normalized_base_url()).dimmed()
    );
    Ok(())
}

fn read_password(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => rpassword::prompt_password("Password: ").context("Failed to read password"),
    }
}

fn report(outcome: AuthOutcome) -> Result<()> {
    match outcome {
        AuthOutcome::Authenticated(session) => {
            println!("{}", format!("Welcome, {}!", session.name()).green());
            print_profile(&session);
            Ok(())
        }
        AuthOutcome::Rejected { message } => bail!(message),
        AuthOutcome::Invalid(errors) => {
            for error in &errors {
                eprintln!("{}", format!("{}: {}", error.field, error.message).red());
            }
            bail!("Please correct the fields above")
        }
        AuthOutcome::Busy => bail!("Another sign-in is already in progress"),
        AuthOutcome::Discarded => bail!("Sign-in was cancelled"),
    }
}

fn print_profile(session: &SessionState) {
    println!("{:<14} {}", "Name:".bold(), session.name());
    println!("{:<14} {}", "Email:".bold(), session.email());
    if let Some(dob) = session.date_of_birth() {
        println!("{:<14} {}", "Date of birth:".bold(), dob);
    }
}
