// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn with_output_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print as pretty JSON")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print as JSON lines")
            .action(ArgAction::SetTrue),
    )
}

fn expense_cmd() -> Command {
    Command::new("expense")
        .about("Record and inspect expenses")
        .subcommand(
            Command::new("add")
                .about("Record an expense")
                .arg(Arg::new("amount").required(true))
                .arg(Arg::new("description").required(true))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help("Omit to let categorization rules decide"),
                )
                .arg(Arg::new("merchant").long("merchant"))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS]; defaults to now"),
                )
                .arg(Arg::new("currency").long("currency"))
                .arg(
                    Arg::new("regret")
                        .long("regret")
                        .help("Flag as a regret purchase")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(with_output_flags(
            Command::new("list")
                .about("List expenses")
                .arg(Arg::new("month").long("month").help("Filter by YYYY-MM"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete an expense")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
        .subcommand(with_output_flags(
            Command::new("search")
                .about("Search expenses by text, category, amount or date range")
                .arg(Arg::new("query").long("query"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("min").long("min"))
                .arg(Arg::new("max").long("max"))
                .arg(Arg::new("from").long("from").help("YYYY-MM-DD"))
                .arg(Arg::new("to").long("to").help("YYYY-MM-DD")),
        ))
        .subcommand(with_output_flags(
            Command::new("duplicates").about("Detect likely duplicate entries"),
        ))
}

fn income_cmd() -> Command {
    Command::new("income")
        .about("Record and inspect income")
        .subcommand(
            Command::new("add")
                .about("Record an income entry")
                .arg(Arg::new("amount").required(true))
                .arg(Arg::new("source").required(true))
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("currency").long("currency")),
        )
        .subcommand(with_output_flags(Command::new("list").about("List income")))
        .subcommand(
            Command::new("rm")
                .about("Delete an income entry")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
}

fn sub_cmd() -> Command {
    Command::new("sub")
        .about("Track subscriptions")
        .subcommand(
            Command::new("add")
                .about("Add a subscription")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("amount").required(true))
                .arg(
                    Arg::new("cycle")
                        .required(true)
                        .help("daily|weekly|monthly|yearly"),
                )
                .arg(Arg::new("category").required(true))
                .arg(
                    Arg::new("next_billing")
                        .long("next-billing")
                        .help("YYYY-MM-DD; defaults to today"),
                )
                .arg(Arg::new("currency").long("currency")),
        )
        .subcommand(with_output_flags(
            Command::new("list").about("List subscriptions").arg(
                Arg::new("all")
                    .long("all")
                    .help("Include cancelled subscriptions")
                    .action(ArgAction::SetTrue),
            ),
        ))
        .subcommand(
            Command::new("cancel")
                .about("Cancel a subscription")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
        .subcommand(with_output_flags(
            Command::new("total").about("Monthly and yearly cost of active subscriptions"),
        ))
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Per-category monthly limits")
        .subcommand(
            Command::new("set")
                .about("Set or replace a category's monthly limit")
                .arg(Arg::new("category").required(true))
                .arg(Arg::new("amount").required(true)),
        )
        .subcommand(with_output_flags(
            Command::new("list")
                .about("All budgets with current spend and status")
                .arg(Arg::new("month").long("month").help("YYYY-MM; defaults to the current month")),
        ))
        .subcommand(with_output_flags(
            Command::new("status")
                .about("Standing of one category's budget")
                .arg(Arg::new("category").required(true))
                .arg(Arg::new("month").long("month")),
        ))
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Savings goals")
        .subcommand(
            Command::new("add")
                .about("Add a goal")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("target").required(true))
                .arg(Arg::new("target_date").required(true).help("YYYY-MM-DD"))
                .arg(Arg::new("current").long("current").help("Amount already saved")),
        )
        .subcommand(with_output_flags(
            Command::new("list").about("List goals with progress"),
        ))
        .subcommand(
            Command::new("fund")
                .about("Update the saved amount")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                .arg(Arg::new("amount").required(true)),
        )
        .subcommand(with_output_flags(
            Command::new("pace")
                .about("Daily and monthly savings needed to hit the target date")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                .arg(Arg::new("as_of").long("as-of").help("YYYY-MM-DD; defaults to today")),
        ))
}

fn debt_cmd() -> Command {
    Command::new("debt")
        .about("Debts and EMI schedules")
        .subcommand(
            Command::new("add")
                .about("Add a debt")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("principal").required(true))
                .arg(Arg::new("rate").required(true).help("Annual interest rate in percent"))
                .arg(
                    Arg::new("months")
                        .required(true)
                        .help("Tenure in months")
                        .value_parser(value_parser!(u32)),
                )
                .arg(Arg::new("start").long("start").help("YYYY-MM-DD; defaults to today")),
        )
        .subcommand(with_output_flags(
            Command::new("list").about("List debts with EMI, remaining and percent paid"),
        ))
        .subcommand(
            Command::new("pay")
                .about("Record a payment against a debt")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                .arg(Arg::new("amount").required(true)),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a debt")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
}

fn recurring_cmd() -> Command {
    Command::new("recurring")
        .about("Recurring transaction templates")
        .subcommand(
            Command::new("add")
                .about("Add a recurring template")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("amount").required(true))
                .arg(Arg::new("category").required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("expense")
                        .help("expense|income"),
                )
                .arg(
                    Arg::new("frequency")
                        .long("frequency")
                        .default_value("monthly")
                        .help("weekly|bi-weekly|monthly|quarterly|yearly"),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .help("First due date, YYYY-MM-DD; defaults to today"),
                ),
        )
        .subcommand(with_output_flags(
            Command::new("list").about("List recurring templates"),
        ))
        .subcommand(
            Command::new("process")
                .about("Materialize every template due on or before the as-of date")
                .arg(Arg::new("as_of").long("as-of").help("YYYY-MM-DD; defaults to today")),
        )
        .subcommand(
            Command::new("pause")
                .about("Deactivate a template")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
        .subcommand(
            Command::new("resume")
                .about("Reactivate a template")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
}

fn insights_cmd() -> Command {
    Command::new("insights")
        .about("Spending-behaviour analytics")
        .subcommand(with_output_flags(
            Command::new("behaviour")
                .about("Weekday patterns, late-night orders, weekend spend and alerts"),
        ))
        .subcommand(with_output_flags(
            Command::new("merchants").about("Spend grouped by well-known merchants"),
        ))
        .subcommand(with_output_flags(
            Command::new("weekly")
                .about("Report over the trailing seven days")
                .arg(Arg::new("as_of").long("as-of").help("YYYY-MM-DD; defaults to today")),
        ))
}

fn rules_cmd() -> Command {
    Command::new("rules")
        .about("Auto-categorization rules")
        .subcommand(
            Command::new("add")
                .about("Add a rule: regex pattern -> category")
                .arg(Arg::new("pattern").required(true))
                .arg(Arg::new("category").required(true))
                .arg(Arg::new("merchant_rewrite").long("merchant-rewrite")),
        )
        .subcommand(Command::new("list").about("List rules"))
        .subcommand(
            Command::new("rm")
                .about("Delete a rule")
                .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
        )
}

fn config_cmd() -> Command {
    Command::new("config")
        .about("User preferences")
        .subcommand(
            Command::new("set")
                .about("Set one or more preferences")
                .arg(Arg::new("currency").long("currency"))
                .arg(Arg::new("language").long("language").help("en|hi|te|ta|kn"))
                .arg(
                    Arg::new("personality")
                        .long("personality")
                        .help("balanced|saver|spender|minimalist|adventurous|foodie"),
                )
                .arg(Arg::new("alerts").long("alerts").help("on|off")),
        )
        .subcommand(with_output_flags(
            Command::new("show").about("Show current preferences"),
        ))
}

pub fn build_cli() -> Command {
    Command::new("spendlens")
        .about("Personal expense tracking, budgets, goals, debts, and spending insights")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(expense_cmd())
        .subcommand(income_cmd())
        .subcommand(sub_cmd())
        .subcommand(budget_cmd())
        .subcommand(goal_cmd())
        .subcommand(debt_cmd())
        .subcommand(recurring_cmd())
        .subcommand(with_output_flags(
            Command::new("dashboard")
                .about("Totals, savings rate, category breakdown, top expenses and trend")
                .arg(
                    Arg::new("days")
                        .long("days")
                        .default_value("30")
                        .value_parser(value_parser!(u32))
                        .help("Trend window: 7 or 30"),
                )
                .arg(
                    Arg::new("top")
                        .long("top")
                        .default_value("3")
                        .value_parser(value_parser!(usize))
                        .help("How many top expenses to rank"),
                ),
        ))
        .subcommand(insights_cmd())
        .subcommand(rules_cmd())
        .subcommand(
            Command::new("import").about("Import records").subcommand(
                Command::new("expenses")
                    .about("Import expenses from CSV: date,amount,category,description,merchant,currency,regret")
                    .arg(Arg::new("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export").about("Export records").subcommand(
                Command::new("expenses")
                    .about("Export expenses")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(config_cmd())
        .subcommand(Command::new("doctor").about("Check the store for suspicious records"))
}
