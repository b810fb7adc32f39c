use crate::cli::context::CliContext;
use crate::db::notification_repo;
use crate::notify::{mailer, TemplateCache};
use crate::ops::{contribution_ops, membership_ops};
use crate::queries::{payout_queries, stats_queries};

pub fn contribute(ctx: &CliContext, args: &str) {
    let Some(pod) = ctx.find_pod(args) else {
        return;
    };
    let Some(membership) = ctx.my_membership(pod.id) else {
        println!("You're not a member of {}.", pod.display_name());
        return;
    };

    let Some(input) = ctx.prompt("Amount: ") else {
        return;
    };
    let amount = match input.replace(',', "").parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            println!("Not a number: {}", input);
            return;
        }
    };

    match contribution_ops::record_contribution(&ctx.conn, membership.id, amount) {
        Ok(updated) => println!(
            "Recorded. Total contributed to {}: {}.",
            pod.display_name(),
            CliContext::format_amount(updated.total_contributed)
        ),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn payout(ctx: &CliContext, args: &str) {
    let Some(pod) = ctx.find_pod(args) else {
        return;
    };
    let Some(membership) = ctx.my_membership(pod.id) else {
        println!("You're not a member of {}.", pod.display_name());
        return;
    };

    match contribution_ops::record_payout(&ctx.conn, membership.id, CliContext::today()) {
        Ok((_, breakdown)) => {
            println!(
                "Payout recorded: {:.2} net of a {:.1}% fee on {}.",
                breakdown.net,
                breakdown.deduction_rate * 100.0,
                CliContext::format_amount(breakdown.gross)
            );

            // email is best-effort; the in-app record is already written
            if !ctx.account.email.is_empty() {
                let cache = TemplateCache::with_defaults();
                let result = mailer::send_email(
                    &cache,
                    "payout-sent",
                    &ctx.account.email,
                    &[
                        ("name", ctx.account.name.clone()),
                        ("pod", pod.display_name()),
                        ("net", format!("{:.2}", breakdown.net)),
                    ],
                );
                if let Err(e) = result {
                    println!("(email not sent: {})", e);
                }
            }
        }
        Err(e) => ctx.print_error(&e),
    }
}

pub fn preview(ctx: &CliContext, args: &str) {
    let Some(pod) = ctx.find_pod(args) else {
        return;
    };
    let Some(membership) = ctx.my_membership(pod.id) else {
        println!("You're not a member of {}.", pod.display_name());
        return;
    };

    match payout_queries::payout_preview(&ctx.conn, membership.id) {
        Ok(Some(preview)) => {
            println!("Payout preview for {}:", pod.display_name());
            match preview.position {
                Some(p) => println!("  Position {} of {}", p, preview.member_count),
                None => println!("  Position not yet fixed ({} members so far)", preview.member_count),
            }
            if let Some(date) = preview.payout_date {
                println!("  Payout date: {}", date);
            }
            println!(
                "  Gross {}  fee {:.1}% ({:.2})  net {:.2}",
                CliContext::format_amount(preview.breakdown.gross),
                preview.breakdown.deduction_rate * 100.0,
                preview.breakdown.fee,
                preview.breakdown.net
            );
        }
        Ok(None) => println!("Membership not found."),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn set_goal(ctx: &CliContext, args: &str) {
    let Some(pod) = ctx.find_pod(args) else {
        return;
    };
    let Some(membership) = ctx.my_membership(pod.id) else {
        println!("You're not a member of {}.", pod.display_name());
        return;
    };

    let Some((goal_type, goal_note)) = ctx.prompt_goal() else {
        return;
    };

    match membership_ops::set_goal(&ctx.conn, membership.id, goal_type, goal_note.as_deref()) {
        Ok(updated) => println!(
            "Goal updated: {}{}",
            updated.goal_type.display_name(),
            updated
                .goal_note
                .map(|n| format!(" ({})", n))
                .unwrap_or_default()
        ),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn backfill(ctx: &CliContext, args: &str) {
    let Some(pod) = ctx.find_pod(args) else {
        return;
    };

    match membership_ops::add_placeholder(&ctx.conn, pod.id, CliContext::today()) {
        Ok(membership) => println!(
            "Reserved slot {} added to {}.",
            membership.join_order,
            pod.display_name()
        ),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn mail_status() {
    match mailer::check_provider() {
        Ok(()) => println!("Mail provider is configured and reachable."),
        Err(e) => println!("{}", e),
    }
}

pub fn notifications(ctx: &CliContext) {
    let items = match notification_repo::find_by_account(&ctx.conn, ctx.account_id()) {
        Ok(n) => n,
        Err(e) => return ctx.print_error(&e),
    };

    if items.is_empty() {
        println!("No notifications.");
        return;
    }

    for item in &items {
        let marker = if item.read { " " } else { "*" };
        println!("{} {}", marker, item.title);
        println!("    {}", item.body);
    }

    match notification_repo::mark_all_read(&ctx.conn, ctx.account_id()) {
        Ok(_) => {}
        Err(e) => ctx.print_error(&e),
    }
}

pub fn print_stats(ctx: &CliContext) {
    match stats_queries::stats(&ctx.conn, ctx.account_id(), CliContext::today()) {
        Ok(stats) => {
            println!("Pods: {} total ({} filling, {} active, {} completed)",
                stats.total_pods, stats.filling_pods, stats.active_pods, stats.completed_pods);
            println!(
                "Members: {} ({} reserved slots)",
                stats.total_members, stats.placeholder_slots
            );
            println!(
                "Total contributed: {}",
                CliContext::format_amount(stats.total_contributed)
            );
            match stats.next_payout {
                Some((name, date)) => println!("Your next payout: {} from {}", date, name),
                None => println!("No upcoming payout."),
            }
        }
        Err(e) => ctx.print_error(&e),
    }
}
