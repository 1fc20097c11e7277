//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;
use zeroize::Zeroizing;

use crate::vault::Entry;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of entries (ID, Title, Username).  Secrets never appear.
pub fn print_entries_table(entries: &[Entry]) {
    if entries.is_empty() {
        info("No entries in this vault yet.");
        tip("Run `credvault add --title <TITLE>` to add your first entry.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Title", "Username"]);

    for e in entries {
        table.add_row(vec![e.id.clone(), e.title.clone(), e.username.clone()]);
    }

    println!("{table}");
}

/// Print one entry.  The secret is masked unless `reveal` is set.
pub fn print_entry(entry: &Entry, reveal: bool) {
    let secret = Zeroizing::new(if reveal {
        String::from_utf8_lossy(&entry.secret).into_owned()
    } else {
        "*".repeat(8)
    });

    println!("{} {}", style("ID:").bold(), entry.id);
    println!("{} {}", style("Title:").bold(), entry.title);
    println!("{} {}", style("Username:").bold(), entry.username);
    println!("{} {}", style("Secret:").bold(), secret.as_str());
    println!("{} {}", style("Notes:").bold(), entry.notes);
}
