// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{arg, command, value_parser, Command};

pub fn build_cli() -> Command {
    command!()
        .about("Shared household finances: ledger, budgets, goals, huchas and statement import")
        .subcommand(Command::new("init").about("Create the database file and exit"))
        .subcommand(household_cmd())
        .subcommand(tx_cmd())
        .subcommand(recurring_cmd())
        .subcommand(budget_cmd())
        .subcommand(goal_cmd())
        .subcommand(hucha_cmd())
        .subcommand(month_cmd())
        .subcommand(pos_cmd())
        .subcommand(
            Command::new("networth")
                .about("Household net worth: savings, positions and huchas")
                .arg(arg!(--live "Fetch live quotes instead of using buy prices"))
                .arg(arg!(--json "Print as JSON")),
        )
        .subcommand(report_cmd())
        .subcommand(import_cmd())
        .subcommand(export_cmd())
}

fn household_cmd() -> Command {
    Command::new("household")
        .about("Create, join or inspect the shared household")
        .subcommand(
            Command::new("create")
                .about("Create a household and make it active")
                .arg(arg!(--name <NAME> "Household name").required(true)),
        )
        .subcommand(
            Command::new("join")
                .about("Join an existing household by its 6-character code")
                .arg(arg!(--code <CODE> "Join code, case-insensitive").required(true)),
        )
        .subcommand(Command::new("show").about("Show the active household and its collections"))
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and list transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(
                    arg!(--kind <KIND> "income, expense, investment or saving")
                        .required(true),
                )
                .arg(arg!(--concept <TEXT> "What this was").required(true))
                .arg(arg!(--amount <AMOUNT> "Positive amount in euros").required(true))
                .arg(arg!(--category <CATEGORY> "One of the fixed categories").required(true))
                .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today")),
        )
        .subcommand(
            Command::new("quick")
                .about("Turn a note like '200€ Mercadona' into a transaction with AI")
                .arg(arg!(<text> "Free-form description"))
                .arg(arg!(--save "Save the suggestion instead of only printing it")),
        )
        .subcommand(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(arg!(--month <MONTH> "Only this month, YYYY-MM"))
                .arg(arg!(--kind <KIND> "Only this kind"))
                .arg(arg!(--category <CATEGORY> "Only this category"))
                .arg(arg!(--limit <N> "Max rows").value_parser(value_parser!(usize)))
                .arg(arg!(--json "Print as JSON"))
                .arg(arg!(--jsonl "Print as JSON lines")),
        )
        .subcommand(
            Command::new("edit")
                .about("Change fields of a transaction")
                .arg(arg!(<id> "Transaction id").value_parser(value_parser!(i64)))
                .arg(arg!(--kind <KIND> "New kind"))
                .arg(arg!(--concept <TEXT> "New concept"))
                .arg(arg!(--amount <AMOUNT> "New amount"))
                .arg(arg!(--category <CATEGORY> "New category"))
                .arg(arg!(--date <DATE> "New date, YYYY-MM-DD")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(arg!(<id> "Transaction id").value_parser(value_parser!(i64))),
        )
}

fn recurring_cmd() -> Command {
    Command::new("recurring")
        .about("Monthly templates for rent, salary, subscriptions")
        .subcommand(
            Command::new("add")
                .about("Create a template, applied once per month on demand")
                .arg(
                    arg!(--kind <KIND> "income, expense, investment or saving")
                        .required(true),
                )
                .arg(arg!(--concept <TEXT> "What this is").required(true))
                .arg(arg!(--amount <AMOUNT> "Positive amount in euros").required(true))
                .arg(arg!(--category <CATEGORY> "One of the fixed categories").required(true)),
        )
        .subcommand(Command::new("list").about("List templates"))
        .subcommand(
            Command::new("rm")
                .about("Delete a template (already applied transactions stay)")
                .arg(arg!(<id> "Template id").value_parser(value_parser!(i64))),
        )
        .subcommand(Command::new("pending").about("Templates not applied this month"))
        .subcommand(
            Command::new("apply")
                .about("Apply pending templates to the current month")
                .arg(arg!(--id <ID> "Apply only this template").value_parser(value_parser!(i64))),
        )
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Monthly spending limits per category")
        .subcommand(
            Command::new("set")
                .about("Set or replace the limit for a category")
                .arg(arg!(--category <CATEGORY> "One of the fixed categories").required(true))
                .arg(arg!(--limit <AMOUNT> "Positive limit in euros").required(true)),
        )
        .subcommand(
            Command::new("rm")
                .about("Remove the limit for a category")
                .arg(arg!(--category <CATEGORY> "One of the fixed categories").required(true)),
        )
        .subcommand(
            Command::new("status")
                .about("Spend against each limit for a month")
                .arg(arg!(--month <MONTH> "YYYY-MM, defaults to the current month"))
                .arg(arg!(--json "Print as JSON"))
                .arg(arg!(--jsonl "Print as JSON lines")),
        )
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Savings goals with a funding target")
        .subcommand(
            Command::new("add")
                .about("Create a goal")
                .arg(arg!(--name <NAME> "Goal name").required(true))
                .arg(arg!(--target <AMOUNT> "Positive target in euros").required(true))
                .arg(arg!(--saved <AMOUNT> "Already saved, defaults to 0"))
                .arg(arg!(--emoji <EMOJI> "Icon shown in listings")),
        )
        .subcommand(Command::new("list").about("List goals and their progress"))
        .subcommand(
            Command::new("contribute")
                .about("Add funds to a goal, capped at its target")
                .arg(arg!(<id> "Goal id").value_parser(value_parser!(i64)))
                .arg(arg!(--amount <AMOUNT> "Positive amount in euros").required(true)),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a goal")
                .arg(arg!(<id> "Goal id").value_parser(value_parser!(i64))),
        )
}

fn hucha_cmd() -> Command {
    Command::new("hucha")
        .about("Named cash reserves that never go negative")
        .subcommand(
            Command::new("add")
                .about("Create a hucha")
                .arg(arg!(--name <NAME> "Hucha name").required(true))
                .arg(arg!(--balance <AMOUNT> "Starting balance, defaults to 0"))
                .arg(arg!(--emoji <EMOJI> "Icon shown in listings")),
        )
        .subcommand(Command::new("list").about("List huchas and the total set aside"))
        .subcommand(
            Command::new("deposit")
                .about("Move money into a hucha")
                .arg(arg!(<id> "Hucha id").value_parser(value_parser!(i64)))
                .arg(arg!(--amount <AMOUNT> "Positive amount in euros").required(true)),
        )
        .subcommand(
            Command::new("withdraw")
                .about("Take money out, stopping at zero")
                .arg(arg!(<id> "Hucha id").value_parser(value_parser!(i64)))
                .arg(arg!(--amount <AMOUNT> "Positive amount in euros").required(true)),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a hucha")
                .arg(arg!(<id> "Hucha id").value_parser(value_parser!(i64))),
        )
}

fn month_cmd() -> Command {
    Command::new("month")
        .about("Track months and close finished ones")
        .subcommand(
            Command::new("open")
                .about("Start tracking a month")
                .arg(arg!(--month <MONTH> "YYYY-MM, defaults to the current month")),
        )
        .subcommand(
            Command::new("close")
                .about("Close a month against new dated writes")
                .arg(arg!(--month <MONTH> "YYYY-MM").required(true)),
        )
        .subcommand(
            Command::new("reopen")
                .about("Reopen a closed month")
                .arg(arg!(--month <MONTH> "YYYY-MM").required(true)),
        )
        .subcommand(Command::new("list").about("Tracked months with their totals"))
}

fn pos_cmd() -> Command {
    Command::new("pos")
        .about("Investment positions")
        .subcommand(
            Command::new("add")
                .about("Add a holding")
                .arg(arg!(--ticker <TICKER> "Symbol as Yahoo Finance knows it").required(true))
                .arg(arg!(--name <NAME> "Human name").required(true))
                .arg(arg!(--shares <SHARES> "Positive share count").required(true))
                .arg(arg!(--"buy-price" <PRICE> "Positive price paid per share").required(true)),
        )
        .subcommand(
            Command::new("list")
                .about("List holdings and their value")
                .arg(arg!(--live "Fetch live quotes instead of using buy prices")),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a holding")
                .arg(arg!(<id> "Position id").value_parser(value_parser!(i64))),
        )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Monthly summaries and history")
        .subcommand(
            Command::new("month")
                .about("Income, outflows and net for a month")
                .arg(arg!(--month <MONTH> "YYYY-MM, defaults to the current month"))
                .arg(arg!(--json "Print as JSON")),
        )
        .subcommand(
            Command::new("categories")
                .about("Expense breakdown by category, biggest first")
                .arg(arg!(--month <MONTH> "YYYY-MM, defaults to the current month"))
                .arg(arg!(--json "Print as JSON"))
                .arg(arg!(--jsonl "Print as JSON lines")),
        )
        .subcommand(
            Command::new("cashflow")
                .about("Income vs expense over the last months")
                .arg(
                    arg!(--window <N> "How many months to include")
                        .value_parser(value_parser!(usize))
                        .default_value("6"),
                )
                .arg(arg!(--json "Print as JSON"))
                .arg(arg!(--jsonl "Print as JSON lines")),
        )
}

fn import_cmd() -> Command {
    Command::new("import")
        .about("Bring transactions in from statements or CSV files")
        .subcommand(
            Command::new("statement")
                .about("Extract transactions from a statement image or PDF with AI")
                .arg(arg!(--path <FILE> "Statement file (jpg, png, webp or pdf)").required(true))
                .arg(arg!(--mime <MIME> "Override the detected file type"))
                .arg(arg!(--"dry-run" "Plan only, write nothing"))
                .arg(
                    arg!(--dedup <POLICY> "Duplicate matching")
                        .value_parser(["exact", "monthly"])
                        .default_value("exact"),
                )
                .arg(arg!(--json "Print the outcome as JSON")),
        )
        .subcommand(
            Command::new("csv")
                .about("Import from a CSV with date,kind,concept,amount,category columns")
                .arg(arg!(--path <FILE> "CSV file").required(true))
                .arg(arg!(--"dry-run" "Plan only, write nothing"))
                .arg(
                    arg!(--dedup <POLICY> "Duplicate matching")
                        .value_parser(["exact", "monthly"])
                        .default_value("exact"),
                )
                .arg(arg!(--json "Print the outcome as JSON")),
        )
}

fn export_cmd() -> Command {
    Command::new("export")
        .about("Write the ledger out for spreadsheets or backups")
        .subcommand(
            Command::new("transactions")
                .about("Export all transactions of the active household")
                .arg(arg!(--format <FORMAT> "csv or json").required(true))
                .arg(arg!(--out <FILE> "Output path").required(true)),
        )
}
