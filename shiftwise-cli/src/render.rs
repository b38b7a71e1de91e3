//! Terminal rendering of jobs, schedules and availability

use colored::*;
use shiftwise_core::domain::job::JobStatus;
use shiftwise_core::domain::request::DateRange;
use shiftwise_core::domain::schedule::ScheduleResult;
use shiftwise_core::dto::availability::AvailabilityResponse;
use shiftwise_core::dto::job::JobStatusResponse;

/// Colorize job status for display
pub fn colorize_status(status: &JobStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        JobStatus::Pending => status_str.yellow(),
        JobStatus::Processing => status_str.cyan(),
        JobStatus::Completed => status_str.green(),
        JobStatus::Failed => status_str.red(),
    }
}

/// Print detailed job information
pub fn print_job_details(job: &JobStatusResponse) {
    println!("{}", "Job Details:".bold());
    println!("  ID:          {}", job.job_id.to_string().cyan());
    println!("  Status:      {}", colorize_status(&job.status));
    println!("  Created:     {}", job.created_at.format("%Y-%m-%d %H:%M:%S"));

    if let Some(completed) = job.completed_at {
        println!("  Completed:   {}", completed.format("%Y-%m-%d %H:%M:%S"));
        let seconds = completed.signed_duration_since(job.created_at).num_seconds();
        println!("  Duration:    {}s", seconds);
    }

    match job.schedule() {
        Ok(Some(result)) => println!(
            "  Shifts:      {} ({:.1}h, {:.2} total cost)",
            result.shifts.len(),
            result.total_hours(),
            result.total_cost()
        ),
        Ok(None) => {}
        Err(e) => println!("  Shifts:      {}", format!("unreadable ({})", e).red()),
    }

    if job.status == JobStatus::Failed {
        println!("\n{}", "Error:".bold());
        println!("{}", job.error_message().red());
    }
}

/// Print a generated schedule, one block per day
pub fn print_schedule(result: &ScheduleResult) {
    let metadata = &result.metadata;

    println!();
    println!(
        "{}",
        format!("Generated {} shift(s):", result.shifts.len()).bold()
    );

    for (day, shifts) in result.shifts_by_day() {
        println!();
        println!("  {}", day.format("%A %Y-%m-%d").to_string().cyan());
        for shift in shifts {
            let phase = shift
                .phase_name
                .as_deref()
                .or(shift.phase_id.as_deref())
                .unwrap_or("-");
            println!(
                "    {} {}-{}  {:<20} {:<10} {:<12} {:>5.1}h {:>8.2}",
                "▸".cyan(),
                shift.start_time.format("%H:%M"),
                shift.end_time.format("%H:%M"),
                shift.staff_name,
                shift.role.dimmed(),
                phase,
                shift.hours,
                shift.cost
            );
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  Shifts:      {}", metadata.total_shifts);
    println!("  Hours:       {:.1}", metadata.total_hours);
    println!("  Cost:        {:.2}", metadata.total_cost);

    let (hours, cost) = (result.total_hours(), result.total_cost());
    if (hours - metadata.total_hours).abs() > 0.05 || (cost - metadata.total_cost).abs() > 0.005 {
        println!(
            "  {} listed shifts add up to {:.1}h and {:.2}",
            "⚠".yellow(),
            hours,
            cost
        );
    }

    let coverage = format!("{:.1}%", metadata.coverage_percentage);
    let coverage = if metadata.coverage_percentage >= 100.0 {
        coverage.green()
    } else if metadata.coverage_percentage >= 80.0 {
        coverage.yellow()
    } else {
        coverage.red()
    };
    println!("  Coverage:    {}", coverage);

    if let Some(reasoning) = &metadata.reasoning {
        println!("\n{}", "Reasoning:".bold());
        println!("{}", reasoning.dimmed());
    }

    if !result.warnings.is_empty() {
        println!("\n{}", "Warnings:".bold());
        for warning in &result.warnings {
            println!("  {} {}", "⚠".yellow(), warning.yellow());
        }
    }
}

/// Print staff availability over `range`
pub fn print_availability(availability: &AvailabilityResponse, range: DateRange) {
    if availability.staff.is_empty() {
        println!("{}", "No staff found for this venue.".yellow());
        return;
    }

    println!(
        "{}",
        format!(
            "{} of {} staff available from {} to {}:",
            availability.available_count(),
            availability.staff.len(),
            range.start_date,
            range.end_date
        )
        .bold()
    );

    for staff in &availability.staff {
        let marker = if staff.available {
            "✓".green()
        } else {
            "✗".red()
        };
        let role = staff.role.as_deref().unwrap_or("");
        println!(
            "  {} {:<20} {} {}",
            marker,
            staff.staff_name,
            staff.staff_id.dimmed(),
            role.dimmed()
        );

        let absent_days = range.days().filter(|day| staff.is_absent_on(*day)).count();
        if absent_days > 0 {
            println!(
                "      {} {} of {} day(s)",
                "absent".yellow(),
                absent_days,
                range.num_days()
            );
        }

        for absence in staff
            .absences
            .iter()
            .filter(|a| range.contains(a.start_date) || a.covers(range.start_date))
        {
            println!(
                "        {} to {}{}",
                absence.start_date,
                absence.end_date,
                absence
                    .reason
                    .as_deref()
                    .map(|r| format!(" ({})", r.to_lowercase()))
                    .unwrap_or_default()
            );
        }
    }
}
