use std::io::{BufRead, Write};

use anyhow::{Context as _, Result};

use cells_picker::{DisplayItem, Notifier, PickOptions, Selector};

/// Line based front-end for terminals where the TUI can't run.
///
/// Items are numbered from 1 in the order they are given. Typing a number
/// picks that item, an empty line or end of input cancels, and anything else
/// narrows the list down to the matching items.
pub struct PromptPicker<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn print_items(
        &mut self,
        items: &[DisplayItem],
        filter: &str,
        options: &PickOptions,
    ) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            if item.matches(filter, options.match_on_description, options.match_on_detail) {
                writeln!(self.output, "{:>4}) {}", i + 1, item)?;
            }
        }
        write!(self.output, "> ")?;
        self.output.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Selector for PromptPicker<R, W> {
    fn select(&mut self, items: &[DisplayItem], options: &PickOptions) -> Result<Option<usize>> {
        writeln!(self.output, "{}", options.placeholder)?;
        let mut filter = String::new();

        loop {
            self.print_items(items, &filter, options)?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("Could not read selection")?;
            let answer = line.trim();
            if read == 0 || answer.is_empty() {
                return Ok(None);
            }

            match answer.parse::<usize>() {
                Ok(n) if (1..=items.len()).contains(&n) => return Ok(Some(n - 1)),
                _ => filter = answer.to_string(),
            }
        }
    }
}

impl<R: BufRead, W: Write> Notifier for PromptPicker<R, W> {
    fn show_error(&mut self, message: &str, _modal: bool) {
        if let Err(err) = writeln!(self.output, "error: {message}") {
            log::warn!("could not show error {message:?}: {err}");
        }
    }
}
