use std::io::IsTerminal;
use std::io::Write;

/// Reports progress of a fixed number of steps.
///
/// Purely cosmetic: implementations never affect control flow.
pub trait Progress {
    /// Advance to the next step, described by `label`.
    fn step(&mut self, label: &str);

    /// Terminate the report once all steps completed.
    fn finish(&mut self);
}

/// Pick the reporter fitting the attached output.
pub fn reporter(total: usize) -> Box<dyn Progress> {
    if std::io::stdout().is_terminal() {
        Box::new(TermProgress::new(total))
    } else {
        Box::new(LineProgress::new(total))
    }
}

/// Single-line reporter that rewrites itself on every step.
pub struct TermProgress {
    current: usize,
    total: usize,
}

impl TermProgress {
    pub fn new(total: usize) -> TermProgress {
        TermProgress { current: 0, total }
    }
}

impl Progress for TermProgress {
    fn step(&mut self, label: &str) {
        self.current += 1;
        print!("\r\x1b[K{}", step_line(label, self.current, self.total));
        let _ = std::io::stdout().flush();
    }

    fn finish(&mut self) {
        if self.current > 0 {
            println!();
        }
    }
}

/// One full line per step, for pipes and logs.
pub struct LineProgress {
    current: usize,
    total: usize,
}

impl LineProgress {
    pub fn new(total: usize) -> LineProgress {
        LineProgress { current: 0, total }
    }
}

impl Progress for LineProgress {
    fn step(&mut self, label: &str) {
        self.current += 1;
        println!("{}", step_line(label, self.current, self.total));
    }

    fn finish(&mut self) {}
}

fn step_line(label: &str, current: usize, total: usize) -> String {
    let percent = if total == 0 {
        100
    } else {
        current * 100 / total
    };
    format!("{} {}% {}/{}", label, percent, current, total)
}

#[cfg(test)]
mod tests {
    use super::step_line;

    #[test]
    fn step_line_reports_percent_and_position() {
        assert_eq!(step_line("osc.rpm", 1, 2), "osc.rpm 50% 1/2");
        assert_eq!(step_line("osc.rpm", 2, 2), "osc.rpm 100% 2/2");
        assert_eq!(step_line("osc.rpm", 1, 3), "osc.rpm 33% 1/3");
    }

    #[test]
    fn step_line_survives_an_empty_sequence() {
        assert_eq!(step_line("nothing", 0, 0), "nothing 100% 0/0");
    }
}
