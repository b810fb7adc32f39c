pub mod context;
pub mod pod_commands;
pub mod member_commands;

use rusqlite::Connection;
use std::path::Path;

use crate::db::{account_repo, notification_repo, plan_repo, schema};
use crate::ops::account_ops;
use context::CliContext;

/// Run the interactive REPL.
pub fn run(db_path: &Path) {
    println!("ajopod - rotating savings pods");
    println!("Type 'help' for commands, 'exit' to quit.");
    println!();

    let conn = match Connection::open(db_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            return;
        }
    };

    if let Err(e) = schema::initialize(&conn) {
        eprintln!("Error initializing database: {}", e);
        return;
    }
    if let Err(e) = plan_repo::seed_defaults(&conn) {
        eprintln!("Error seeding plans: {}", e);
        return;
    }

    let ctx = match load_or_init(conn) {
        Some(ctx) => ctx,
        None => return,
    };

    repl_loop(&ctx);
}

fn load_or_init(conn: Connection) -> Option<CliContext> {
    match account_repo::find_first(&conn) {
        Ok(Some(account)) => {
            let unread = notification_repo::unread_count(&conn, account.id).unwrap_or(0);
            if unread > 0 {
                println!(
                    "Welcome back, {}. You have {} unread notification(s).",
                    account.name, unread
                );
            } else {
                println!("Welcome back, {}.", account.name);
            }
            Some(CliContext::new(conn, account))
        }
        Ok(None) => init_new_account(conn),
        Err(e) => {
            println!("Error loading data: {}", e);
            println!("Starting fresh...");
            init_new_account(conn)
        }
    }
}

fn init_new_account(conn: Connection) -> Option<CliContext> {
    println!();
    print!("What's your name? ");
    use std::io::Write;
    std::io::stdout().flush().ok();

    let mut name = String::new();
    std::io::stdin().read_line(&mut name).ok()?;
    let name = name.trim().to_string();

    let name_lower = name.to_lowercase();
    if name_lower == "exit" || name_lower == "quit" || name_lower == "q" {
        return None;
    }

    if name.is_empty() {
        println!("Name cannot be empty. Please restart and try again.");
        return None;
    }

    print!("Email (optional, for payout notices): ");
    std::io::stdout().flush().ok();
    let mut email = String::new();
    std::io::stdin().read_line(&mut email).ok()?;
    let email = email.trim().to_string();

    let account = match account_ops::register(&conn, &name, &email) {
        Ok(a) => a,
        Err(e) => {
            println!("Error creating account: {}", e);
            return None;
        }
    };

    println!("Welcome, {}! Type 'plans' to see what's on offer.", account.name);
    println!();

    Some(CliContext::new(conn, account))
}

fn repl_loop(ctx: &CliContext) {
    loop {
        let input = match ctx.read_line("> ") {
            Some(s) => s,
            None => break,
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, args) = parse_command(input);

        match command {
            "help" | "?" => print_help(),
            "quit" | "exit" | "q" => break,

            // Plans and joining
            "plans" => pod_commands::list_plans(ctx),
            "join" => pod_commands::join(ctx, args),
            "create-pod" => pod_commands::create(ctx),
            "accept-invite" => pod_commands::accept_invite(ctx, args),

            // Pods
            "pods" | "list" | "ls" => pod_commands::list(ctx),
            "show-pod" | "show" | "view" => pod_commands::show(ctx, args),
            "schedule" => pod_commands::schedule(ctx, args),
            "sweep" => pod_commands::sweep(ctx),

            // Membership
            "contribute" => member_commands::contribute(ctx, args),
            "payout" => member_commands::payout(ctx, args),
            "preview" => member_commands::preview(ctx, args),
            "set-goal" => member_commands::set_goal(ctx, args),
            "backfill" => member_commands::backfill(ctx, args),

            // Other
            "notifications" | "inbox" => member_commands::notifications(ctx),
            "mail-status" => member_commands::mail_status(),
            "stats" => member_commands::print_stats(ctx),

            _ => println!("Unknown command: {}. Type 'help' for commands.", command),
        }
    }
}

/// Parse input into command and args.
fn parse_command(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(|c: char| c == ' ' || c == '\t') {
        Some(pos) => (&input[..pos], input[pos..].trim()),
        None => (input, ""),
    }
}

fn print_help() {
    println!(
        r#"
COMMANDS:

  Plans & joining:
    plans                   List catalog plans
    join <plan-code>        Join the open pod for a plan
    create-pod              Create a custom invite-only pod (interactive)
    accept-invite <code>    Join a custom pod by invite code

  Pods:
    pods                    List your pods
    show-pod <name>         Pod details, your position and progress
    schedule <name>         Full payout schedule for a pod
    sweep                   Re-evaluate pod lifecycles now

  Membership:
    contribute <pod>        Record a contribution
    payout <pod>            Record your payout once it's due
    preview <pod>           Preview your payout figures
    set-goal <pod>          Update what you're saving toward
    backfill <pod>          Reserve a placeholder slot (back office)

  Other:
    notifications           Show your notifications
    mail-status             Check the email provider configuration
    stats                   Show overall statistics
    help                    Show this help
    exit / quit / q         Exit

TIPS:
  - Pod names match case-insensitively; short ids work too
  - Run 'sweep' (or `ajopod --sweep` from cron) to advance pod lifecycles"#
    );
}
