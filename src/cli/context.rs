use chrono::Local;
use rusqlite::Connection;
use std::io::{self, Write};

use crate::model::*;
use crate::queries::pod_queries;

pub struct CliContext {
    pub conn: Connection,
    pub account: Account,
}

impl CliContext {
    pub fn new(conn: Connection, account: Account) -> Self {
        Self { conn, account }
    }

    pub fn account_id(&self) -> Id<Account> {
        self.account.id
    }

    /// Prompt and read a line from stdin. Returns None on EOF.
    pub fn read_line(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim_end_matches('\n').trim_end_matches('\r').to_string()),
            Err(_) => None,
        }
    }

    /// Read a line, trimmed.
    pub fn prompt(&self, prompt: &str) -> Option<String> {
        self.read_line(prompt).map(|s| s.trim().to_string())
    }

    /// Find one of the account's pods by name, plan code or short id prefix.
    /// Prints an error if nothing or too much matches.
    pub fn find_pod(&self, args: &str) -> Option<Pod> {
        let query = args.trim();
        if query.is_empty() {
            return None;
        }

        let pods = pod_queries::pods_for_account(&self.conn, self.account_id()).unwrap_or_default();
        let lower = query.to_lowercase();
        let matches: Vec<&Pod> = pods
            .iter()
            .filter(|p| {
                p.display_name().to_lowercase().contains(&lower)
                    || p.plan_code
                        .as_ref()
                        .map(|c| c.to_lowercase().contains(&lower))
                        .unwrap_or(false)
                    || p.id.short().starts_with(&lower)
            })
            .collect();

        match matches.len() {
            0 => {
                println!("No pod found matching '{}'", query);
                None
            }
            1 => Some(matches[0].clone()),
            _ => {
                if let Some(exact) = matches
                    .iter()
                    .find(|p| p.display_name().eq_ignore_ascii_case(query))
                {
                    return Some((*exact).clone());
                }
                println!("Multiple matches found:");
                for p in &matches {
                    println!("  {} [{}]", p.display_name(), p.id.short());
                }
                println!("Please be more specific.");
                None
            }
        }
    }

    /// The requesting account's membership in a pod, if any.
    pub fn my_membership(&self, pod_id: Id<Pod>) -> Option<Membership> {
        crate::db::membership_repo::find_by_pod_and_account(&self.conn, pod_id, self.account_id())
            .ok()
            .flatten()
    }

    /// Prompt for a goal type; empty input defaults to Savings.
    pub fn prompt_goal(&self) -> Option<(GoalType, Option<String>)> {
        let names: Vec<&str> = GoalType::ALL.iter().map(|g| g.display_name()).collect();
        println!("Goal types: {}", names.join(", "));
        let input = self.prompt("Goal type [Savings]: ")?;
        let goal_type = if input.is_empty() {
            GoalType::Savings
        } else {
            match GoalType::from_db_str(&capitalize(&input)) {
                Some(g) => g,
                None => {
                    println!("Unknown goal type: {}", input);
                    return None;
                }
            }
        };

        let note = if goal_type.requires_note() {
            let note = self.prompt("Goal note (required for Other): ")?;
            if note.is_empty() {
                println!("A note is required for the Other goal type.");
                return None;
            }
            Some(note)
        } else {
            let note = self.prompt("Goal note (optional): ")?;
            if note.is_empty() {
                None
            } else {
                Some(note)
            }
        };

        Some((goal_type, note))
    }

    pub fn format_amount(amount: i64) -> String {
        let digits = amount.abs().to_string();
        let mut grouped = String::new();
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        if amount < 0 {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }

    pub fn today() -> chrono::NaiveDate {
        Local::now().date_naive()
    }

    /// Print an error.
    pub fn print_error(&self, e: &crate::error::AjoError) {
        println!("Error: {}", e);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
