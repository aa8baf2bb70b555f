use std::time::Instant;

/// Prints timing output after a command, matching the interactive prompt's
/// "N rows affected in (T sec)" convention.
pub struct Show {
    show_stats: bool,
    is_repl: bool,
    start: Instant,
}

impl Show {
    pub fn new(show_stats: bool, is_repl: bool) -> Self {
        Self::new_with_start(show_stats, is_repl, Instant::now())
    }

    pub fn new_with_start(show_stats: bool, is_repl: bool, start: Instant) -> Self {
        Show { show_stats, is_repl, start }
    }

    pub fn output(&self, affected: i64) {
        if !self.show_stats || !self.is_repl {
            return;
        }
        if affected > 0 {
            eprintln!("{} rows affected in ({:.3} sec)", affected, self.start.elapsed().as_secs_f64());
        } else {
            eprintln!("processed in ({:.3} sec)", self.start.elapsed().as_secs_f64());
        }
        eprintln!();
    }
}
