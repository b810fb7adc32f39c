use std::path::PathBuf;

use rand::thread_rng;

fn main() {
    let mut args = std::env::args().skip(1);
    let mut db_path: Option<PathBuf> = None;
    let mut import_path: Option<PathBuf> = None;
    let mut sweep_once = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--file" | "-f" => {
                db_path = args.next().map(PathBuf::from);
                if db_path.is_none() {
                    eprintln!("Error: --file requires a path argument");
                    std::process::exit(1);
                }
            }
            "--import" => {
                import_path = args.next().map(PathBuf::from);
                if import_path.is_none() {
                    eprintln!("Error: --import requires a JSON file path");
                    std::process::exit(1);
                }
            }
            "--sweep" => {
                sweep_once = true;
            }
            "--help" | "-h" => {
                println!("ajopod - rotating savings pods");
                println!();
                println!("Usage: ajopod [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -f, --file <PATH>      Database file path (default: .data/ajopod.db)");
                println!("  --import <JSON_PATH>   Import a legacy backend JSON export");
                println!("  --sweep                Run one lifecycle sweep and exit (cron-friendly)");
                println!("  -h, --help             Show this help");
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("Use --help for usage information.");
                std::process::exit(1);
            }
        }
    }

    let db_path = db_path.unwrap_or_else(|| {
        let dir = PathBuf::from(".data");
        if !dir.exists() {
            std::fs::create_dir_all(&dir).expect("Failed to create .data directory");
        }
        dir.join("ajopod.db")
    });

    if let Some(json_path) = import_path {
        println!("Importing from {}...", json_path.display());
        if db_path.exists() {
            eprintln!("Error: Database file {} already exists.", db_path.display());
            eprintln!("Remove it first or use --file to specify a different path.");
            std::process::exit(1);
        }
        match ajopod::migrate::import_json(&json_path, &db_path) {
            Ok(stats) => {
                println!("Import complete!");
                println!("  Accounts: {}", stats.accounts);
                println!("  Pods: {}", stats.pods);
                println!("  Memberships: {}", stats.memberships);
            }
            Err(e) => {
                eprintln!("Import failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if sweep_once {
        run_sweep_once(&db_path);
        return;
    }

    ajopod::cli::run(&db_path);
}

fn run_sweep_once(db_path: &std::path::Path) {
    let conn = match rusqlite::Connection::open(db_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error opening database: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = ajopod::db::schema::initialize(&conn) {
        eprintln!("Error initializing database: {}", e);
        std::process::exit(1);
    }

    let today = chrono::Local::now().date_naive();
    let mut rng = thread_rng();
    match ajopod::ops::lifecycle_ops::run_sweep(&conn, today, &mut rng) {
        Ok(outcome) => {
            println!(
                "Swept {} pod(s): {} scheduled, {} in grace, {} locked, {} completed",
                outcome.evaluated,
                outcome.starts_scheduled,
                outcome.entered_grace,
                outcome.locked,
                outcome.completed
            );
        }
        Err(e) => {
            eprintln!("Sweep failed: {}", e);
            std::process::exit(1);
        }
    }
}
