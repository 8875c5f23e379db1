use crate::disk_info::{self, DiskInfo};
use crate::ledger::RunAccumulator;
use crate::output::{self, SummaryView};

/// Print the end-of-run summary for everything in `ledger`.
pub fn print(
    ledger: &RunAccumulator,
    run_id: &str,
    before: Option<DiskInfo>,
    after: Option<DiskInfo>,
) {
    let binary = std::env::args().next().unwrap_or_else(|| "dirclean".to_string());
    let disk_note = disk_info::describe_change(before, after, ledger.deleted_count());
    output::print_summary(&SummaryView {
        binary: &binary,
        run_id,
        file_count: ledger.len(),
        total_bytes: ledger.total_bytes(),
        disk_note: &disk_note,
    });
}
