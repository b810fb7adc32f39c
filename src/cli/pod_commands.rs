use rand::thread_rng;

use crate::cli::context::CliContext;
use crate::db::plan_repo;
use crate::engine::payout;
use crate::model::*;
use crate::ops::{lifecycle_ops, pod_ops};
use crate::queries::{payout_queries, pod_queries};

pub fn list_plans(ctx: &CliContext) {
    let plans = match plan_repo::find_active(&ctx.conn) {
        Ok(p) => p,
        Err(e) => return ctx.print_error(&e),
    };

    if plans.is_empty() {
        println!("No plans available.");
        return;
    }

    println!("Available plans:");
    for plan in plans {
        let cycles = payout::cycle_count(plan.lifecycle_weeks);
        println!(
            "  {:<10} {} per cycle, {} weeks, {} members, pays out {}",
            plan.code,
            CliContext::format_amount(plan.amount),
            plan.lifecycle_weeks,
            plan.max_members,
            CliContext::format_amount(plan.amount * cycles as i64),
        );
    }
}

pub fn join(ctx: &CliContext, args: &str) {
    let code = args.trim();
    if code.is_empty() {
        println!("Usage: join <plan-code>");
        return;
    }

    let Some((goal_type, goal_note)) = ctx.prompt_goal() else {
        return;
    };

    match pod_ops::join_plan(
        &ctx.conn,
        ctx.account_id(),
        code,
        goal_type,
        goal_note.as_deref(),
        CliContext::today(),
    ) {
        Ok((pod, membership)) => {
            println!(
                "Joined {} in position {}.",
                pod.display_name(),
                membership.join_order
            );
            if let Some(start) = pod.scheduled_start_date {
                println!("The pod is full and set to start on {}.", start);
            }
        }
        Err(e) => ctx.print_error(&e),
    }
}

pub fn create(ctx: &CliContext) {
    let Some(name) = ctx.prompt("Pod name: ") else {
        return;
    };
    let Some(amount) = prompt_i64(ctx, "Contribution amount per cycle: ") else {
        return;
    };
    let Some(lifecycle_weeks) = prompt_i32(ctx, "Lifecycle in weeks: ") else {
        return;
    };
    let Some(max_members) = prompt_i32(ctx, "Maximum members: ") else {
        return;
    };

    let options: Vec<&str> = Cadence::ALL.iter().map(|c| c.display_name()).collect();
    println!("Cadences: {}", options.join(", "));
    let cadence = match ctx.prompt("Cadence (biweekly/monthly) [biweekly]: ") {
        Some(s) if s.eq_ignore_ascii_case("monthly") => Cadence::Monthly,
        Some(_) => Cadence::BiWeekly,
        None => return,
    };

    let expected = ctx
        .prompt("Expected member count (blank = full capacity): ")
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i32>().ok());

    let randomize = matches!(
        ctx.prompt("Randomize payout order? (y/N): ").as_deref(),
        Some("y") | Some("Y") | Some("yes")
    );

    let Some((goal_type, goal_note)) = ctx.prompt_goal() else {
        return;
    };

    match pod_ops::create_custom_pod(
        &ctx.conn,
        ctx.account_id(),
        &name,
        amount,
        lifecycle_weeks,
        max_members,
        cadence,
        expected,
        randomize,
        goal_type,
        goal_note.as_deref(),
        CliContext::today(),
    ) {
        Ok((pod, _)) => {
            println!("Created {}.", pod.display_name());
            if let Some(code) = &pod.invite_code {
                println!("Share this invite code: {}", code);
            }
        }
        Err(e) => ctx.print_error(&e),
    }
}

pub fn accept_invite(ctx: &CliContext, args: &str) {
    let code = args.trim();
    if code.is_empty() {
        println!("Usage: accept-invite <code>");
        return;
    }

    let Some((goal_type, goal_note)) = ctx.prompt_goal() else {
        return;
    };

    match pod_ops::accept_invite(
        &ctx.conn,
        ctx.account_id(),
        code,
        goal_type,
        goal_note.as_deref(),
        CliContext::today(),
    ) {
        Ok((pod, membership)) => println!(
            "Joined {} in position {}.",
            pod.display_name(),
            membership.join_order
        ),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn list(ctx: &CliContext) {
    let pods = match pod_queries::pods_for_account(&ctx.conn, ctx.account_id()) {
        Ok(p) => p,
        Err(e) => return ctx.print_error(&e),
    };

    if pods.is_empty() {
        println!("You're not in any pod yet. Try 'plans' then 'join <plan-code>'.");
        return;
    }

    for pod in pods {
        let next = pod
            .next_payout_date
            .map(|d| format!(", next payout {}", d))
            .unwrap_or_default();
        println!(
            "  {} [{}]  {}  {}/cycle{}",
            pod.display_name(),
            pod.id.short(),
            pod.status.display_name(),
            CliContext::format_amount(pod.amount),
            next
        );
    }
}

pub fn show(ctx: &CliContext, args: &str) {
    let Some(pod) = ctx.find_pod(args) else {
        return;
    };

    let detail = match pod_queries::pod_detail(&ctx.conn, pod.id, ctx.account_id()) {
        Ok(Some(d)) => d,
        Ok(None) => return println!("Pod not found."),
        Err(e) => return ctx.print_error(&e),
    };

    let pod = &detail.pod;
    println!("{} [{}]", pod.display_name(), pod.id.short());
    println!(
        "  {} {} pod, {} per cycle, {} weeks, {} cycles",
        pod.status.display_name(),
        pod.pod_type.display_name().to_lowercase(),
        CliContext::format_amount(pod.amount),
        pod.lifecycle_weeks,
        detail.cycles_total
    );
    if let Some(cadence) = pod.cadence {
        println!("  Cadence: {}", cadence.display_name());
    }
    println!(
        "  Members: {}/{}",
        detail.members.len(),
        pod.max_members
    );
    if let Some(start) = pod.scheduled_start_date {
        println!("  Scheduled start: {}", start);
    }
    if let Some(date) = pod.next_payout_date {
        println!("  Next payout: {}", date);
    }
    if let Some(code) = &pod.invite_code {
        if pod.accepts_members() {
            println!("  Invite code: {}", code);
        }
    }

    if let Some(my) = &detail.my_membership {
        println!(
            "  Your target: {} (contributed {}, {:.2}%)",
            CliContext::format_amount(detail.contribution_target),
            CliContext::format_amount(my.total_contributed),
            detail.my_progress.unwrap_or(0.0)
        );
    }

    match &detail.queue {
        Some(queue) => {
            println!(
                "  Your payout position: {} ({} ahead of you, {} behind you)",
                queue.my_position,
                queue.ahead_of_you.len(),
                queue.behind_you.len()
            );
        }
        None => println!("  Payout order is fixed when the pod locks."),
    }
}

pub fn schedule(ctx: &CliContext, args: &str) {
    let Some(pod) = ctx.find_pod(args) else {
        return;
    };

    let previews = match payout_queries::pod_schedule(&ctx.conn, pod.id) {
        Ok(p) => p,
        Err(e) => return ctx.print_error(&e),
    };

    if previews.is_empty() {
        println!("No members yet.");
        return;
    }

    println!("Payout schedule for {}:", pod.display_name());
    for preview in previews {
        let who = if preview.membership.is_placeholder() {
            "(reserved slot)".to_string()
        } else {
            format!("member {}", &preview.membership.public_id[..8])
        };
        let position = preview
            .position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".into());
        let date = preview
            .payout_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "TBD".into());
        let paid = if preview.membership.paid_out {
            "  [paid]"
        } else {
            ""
        };
        println!(
            "  #{:<3} {:<18} {}  net {:.2} ({:.1}% fee){}",
            position,
            who,
            date,
            preview.breakdown.net,
            preview.breakdown.deduction_rate * 100.0,
            paid
        );
    }
}

pub fn sweep(ctx: &CliContext) {
    let mut rng = thread_rng();
    match lifecycle_ops::run_sweep(&ctx.conn, CliContext::today(), &mut rng) {
        Ok(outcome) => {
            println!("Evaluated {} pod(s).", outcome.evaluated);
            if outcome.is_quiet() {
                println!("Nothing was due.");
            } else {
                if outcome.starts_scheduled > 0 {
                    println!("  Starts scheduled: {}", outcome.starts_scheduled);
                }
                if outcome.entered_grace > 0 {
                    println!("  Entered grace: {}", outcome.entered_grace);
                }
                if outcome.locked > 0 {
                    println!("  Locked: {}", outcome.locked);
                }
                if outcome.completed > 0 {
                    println!("  Completed: {}", outcome.completed);
                }
            }
        }
        Err(e) => ctx.print_error(&e),
    }
}

fn prompt_i64(ctx: &CliContext, prompt: &str) -> Option<i64> {
    let input = ctx.prompt(prompt)?;
    match input.replace(',', "").parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            println!("Not a number: {}", input);
            None
        }
    }
}

fn prompt_i32(ctx: &CliContext, prompt: &str) -> Option<i32> {
    let input = ctx.prompt(prompt)?;
    match input.parse::<i32>() {
        Ok(n) => Some(n),
        Err(_) => {
            println!("Not a number: {}", input);
            None
        }
    }
}
