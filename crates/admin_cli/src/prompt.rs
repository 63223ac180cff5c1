//! Password prompt without echo on the controlling terminal.

use std::error::Error;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
};

type PromptResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> PromptResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Why a new password was refused.
#[derive(Debug, PartialEq, Eq)]
enum Refusal {
    Empty,
    Mismatch,
}

fn confirm(first: String, second: &str) -> Result<String, Refusal> {
    if first.is_empty() {
        Err(Refusal::Empty)
    } else if first != second {
        Err(Refusal::Mismatch)
    } else {
        Ok(first)
    }
}

fn read_hidden(prompt: &str) -> PromptResult<String> {
    let _raw = RawModeGuard::enter()?;
    let mut out = std::io::stderr();
    execute!(out, Print(prompt))?;

    let mut typed = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => break,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => typed.push(ch),
            KeyCode::Backspace => {
                typed.pop();
            }
            _ => {}
        }
    }
    execute!(out, Print("\r\n"))?;
    Ok(typed)
}

/// Read the password of a new account, typed twice without echo.
pub fn new_password() -> PromptResult<String> {
    let first = read_hidden("Password: ")?;
    let second = read_hidden("Confirm password: ")?;
    confirm(first, &second).map_err(|refusal| match refusal {
        Refusal::Empty => "password must not be empty".into(),
        Refusal::Mismatch => "passwords do not match".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_needs_a_matching_confirmation() {
        assert_eq!(confirm(String::new(), ""), Err(Refusal::Empty));
        assert_eq!(confirm("hunter2".into(), "hunter3"), Err(Refusal::Mismatch));
        assert_eq!(confirm("hunter2".into(), "hunter2"), Ok("hunter2".to_string()));
    }
}
