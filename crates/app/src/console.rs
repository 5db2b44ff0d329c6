//! Terminal implementation of the session console.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Stylize;
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, execute};
use services::{Prompt, RevealSignal, SessionConsole, SessionEvent, WaitOutcome};

/// How often the reveal wait re-checks its deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

const DENY_HINT: &str = "(Enter 'N' to deny)";

/// Restores cooked mode however the wait ends.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Terminal input as seen by the reveal wait.
trait KeySource {
    /// Wait up to `timeout` for an event; true if one is ready.
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
}

struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        event::read()
    }
}

/// Wait for any key press until `timeout` elapses. Ctrl+C and Esc abort.
fn wait_for_key(keys: &mut impl KeySource, timeout: Duration) -> io::Result<WaitOutcome> {
    let deadline = Instant::now() + timeout;
    loop {
        let now = Instant::now();
        if now >= deadline {
            return Ok(WaitOutcome::TimedOut);
        }
        if !keys.poll((deadline - now).min(POLL_INTERVAL))? {
            continue;
        }
        if let Event::Key(key) = keys.read()?
            && key.kind == KeyEventKind::Press
        {
            if is_abort(&key) {
                return Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "revision aborted",
                ));
            }
            return Ok(WaitOutcome::Signaled);
        }
    }
}

fn is_abort(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Esc => true,
        _ => false,
    }
}

/// Console on stdin/stdout.
pub struct TerminalConsole {
    out: io::Stdout,
}

impl TerminalConsole {
    #[must_use]
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }

    /// Wipe the screen and home the cursor.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the terminal rejects the command.
    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    /// Print `text` and read one line of input, without the line terminator.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEof` if stdin is closed, or other I/O errors.
    pub fn read_line(&mut self, text: &str) -> io::Result<String> {
        write!(self.out, "{text}")?;
        self.out.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }

    /// Print a line of text.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if stdout cannot be written.
    pub fn say(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealSignal for TerminalConsole {
    fn await_signal(&mut self, timeout: Duration) -> io::Result<WaitOutcome> {
        write!(self.out, "Show Solution? ")?;
        self.out.flush()?;

        let outcome = {
            let _raw = RawModeGuard::enable()?;
            wait_for_key(&mut CrosstermKeys, timeout)?
        };

        writeln!(self.out)?;
        Ok(outcome)
    }
}

impl SessionConsole for TerminalConsole {
    fn show(&mut self, event: SessionEvent<'_>) -> io::Result<()> {
        match event {
            SessionEvent::Presented(p) => {
                self.clear()?;
                let heading = format!(
                    "WORD {}/{}: {}",
                    p.progress.number, p.progress.total, p.entry.word
                );
                self.say(heading.red().bold())?;
                self.say("")
            }
            SessionEvent::TimedOut => self.say("(Oops! Time up)"),
            SessionEvent::Revealed(word) => {
                self.say("")?;
                self.say(format!("MEANING: {}\n", word.meaning).yellow())?;
                self.say(format!("SYNONYMS: {}; {}\n", word.synonym_1, word.synonym_2).yellow())?;
                self.say(format!("SENTENCE 1: {}", word.sentence_1).yellow())?;
                self.say(format!("SENTENCE 2: {}", word.sentence_2).yellow())?;
                self.say("")
            }
            SessionEvent::CheckpointSaved { attempted, .. } => {
                self.clear()?;
                self.say(format!("Checkpoint saved. You revised {attempted} words."))
            }
            SessionEvent::Discarded { attempted } => {
                self.clear()?;
                self.say(format!("Progress discarded. You revised {attempted} words."))
            }
            SessionEvent::Completed(summary) => {
                self.say("")?;
                self.say(
                    format!(
                        "Revision completed. You revised {} words.",
                        summary.attempted
                    )
                    .green(),
                )?;
                self.say(
                    format!(
                        "Performance: {}/{}",
                        summary.correct_words.len(),
                        summary.attempted
                    )
                    .green(),
                )?;
                if !summary.incorrect_words.is_empty() {
                    self.say("\n\nIncorrect Words:")?;
                    for (i, word) in summary.incorrect_words.iter().enumerate() {
                        self.say(format!("{}: {word}", i + 1))?;
                    }
                }
                Ok(())
            }
        }
    }

    fn ask(&mut self, prompt: Prompt<'_>) -> io::Result<String> {
        match prompt {
            Prompt::Grade => self.read_line(&format!("Did you get it right? {DENY_HINT}\n")),
            Prompt::ShowNext => self.read_line(&format!("Show Next? {DENY_HINT}\n")),
            Prompt::SaveProgress => {
                self.read_line(&format!("\nDo you wish to save? {DENY_HINT}\n"))
            }
            Prompt::UseExistingCheckpoint => {
                self.read_line(&format!("\nUse existing checkpoint? {DENY_HINT}\n"))
            }
            Prompt::CheckpointName => self.read_line("\nEnter checkpoint name: \n"),
            Prompt::ChooseCheckpoint(names) => {
                for (i, name) in names.iter().enumerate() {
                    self.say(format!("{i}: {name}"))?;
                }
                self.read_line("\nEnter your choice: ")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays queued events; with none left it idles out each poll.
    struct QueuedKeys {
        events: VecDeque<Event>,
        polls: usize,
    }

    impl QueuedKeys {
        fn new(events: impl IntoIterator<Item = Event>) -> Self {
            Self {
                events: events.into_iter().collect(),
                polls: 0,
            }
        }
    }

    impl KeySource for QueuedKeys {
        fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
            self.polls += 1;
            if self.events.is_empty() {
                std::thread::sleep(timeout);
                return Ok(false);
            }
            Ok(true)
        }

        fn read(&mut self) -> io::Result<Event> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("no queued event"))
        }
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn no_input_times_out_after_the_deadline() {
        let mut keys = QueuedKeys::new(Vec::<Event>::new());
        let timeout = Duration::from_millis(120);
        let started = Instant::now();

        let outcome = wait_for_key(&mut keys, timeout).unwrap();

        assert_eq!(outcome, WaitOutcome::TimedOut);
        assert!(started.elapsed() >= timeout);
        assert!(keys.polls >= 2, "polled {} times", keys.polls);
    }

    #[test]
    fn any_key_press_signals() {
        let mut keys = QueuedKeys::new([press(KeyCode::Enter, KeyModifiers::NONE)]);
        let outcome = wait_for_key(&mut keys, Duration::from_secs(5)).unwrap();
        assert_eq!(outcome, WaitOutcome::Signaled);
    }

    #[test]
    fn releases_and_other_events_are_ignored() {
        let release = Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        let mut keys = QueuedKeys::new([release, Event::FocusGained]);
        let outcome = wait_for_key(&mut keys, Duration::from_millis(60)).unwrap();
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[test]
    fn ctrl_c_and_escape_abort_the_wait() {
        for event in [
            press(KeyCode::Char('c'), KeyModifiers::CONTROL),
            press(KeyCode::Esc, KeyModifiers::NONE),
        ] {
            let mut keys = QueuedKeys::new([event]);
            let err = wait_for_key(&mut keys, Duration::from_secs(5)).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::Interrupted);
        }
    }
}
