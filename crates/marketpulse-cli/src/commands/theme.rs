use anyhow::Result;
use colored::Colorize;
use marketpulse_core::theme::ThemePreference;

use super::context::AppContext;
use crate::ThemeAction;

pub fn run(context: &AppContext, action: ThemeAction) -> Result<()> {
    match action {
        ThemeAction::Show => print_theme(context.theme.theme()),
        ThemeAction::Toggle => {
            let theme = context.theme.toggle_theme();
            println!("{}", format!("Switched to {} mode", theme).green());
            print_theme(theme);
        }
        ThemeAction::Set { theme } => {
            if context.theme.set_theme(theme) {
                println!("{}", format!("Switched to {} mode", theme).green());
            } else {
                println!("Already using {} mode", theme);
            }
            print_theme(theme);
        }
    }
    Ok(())
}

fn print_theme(theme: ThemePreference) {
    let label = if theme.is_dark() {
        theme.as_str().bright_white().on_black()
    } else {
        theme.as_str().black().on_bright_white()
    };
    println!("Theme: {}", label);
    println!("{}", format!("({})", theme.toggle_hint()).dimmed());
}
