// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(arg!(--json "Print JSON").action(ArgAction::SetTrue))
        .arg(arg!(--jsonl "Print JSON lines").action(ArgAction::SetTrue))
}

fn user_arg() -> Arg {
    arg!(--user <NAME> "User (defaults to the active user)").required(false)
}

fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .value_name("TYPE")
        .help("income|expense")
}

fn users() -> Command {
    Command::new("user")
        .about("Manage users and their monthly salary")
        .subcommand(
            Command::new("add")
                .arg(arg!(--name <NAME>).required(true))
                .arg(arg!(--salary <AMOUNT> "Monthly salary").required(false)),
        )
        .subcommand(Command::new("list"))
        .subcommand(
            Command::new("set-salary")
                .arg(arg!(--name <NAME>).required(true))
                .arg(arg!(--salary <AMOUNT>).required(true)),
        )
        .subcommand(
            Command::new("use")
                .about("Select the active user")
                .arg(arg!(--name <NAME>).required(true)),
        )
}

fn categories() -> Command {
    Command::new("category")
        .about("Manage categories")
        .subcommand(Command::new("add").arg(arg!(--name <NAME>).required(true)))
        .subcommand(Command::new("list"))
        .subcommand(Command::new("rm").arg(arg!(--name <NAME>).required(true)))
}

fn transactions() -> Command {
    Command::new("tx")
        .about("Record and list income and expenses")
        .subcommand(
            Command::new("add")
                .arg(user_arg())
                .arg(arg!(--date <DATE> "YYYY-MM-DD").required(true))
                .arg(type_arg().required(true))
                .arg(arg!(--amount <AMOUNT> "Non-negative amount").required(true))
                .arg(arg!(--category <CATEGORY>).required(false))
                .arg(arg!(--note <NOTE>).required(false)),
        )
        .subcommand(json_flags(
            Command::new("list")
                .arg(user_arg())
                .arg(arg!(--month <MONTH> "YYYY-MM").required(false))
                .arg(arg!(--category <CATEGORY>).required(false))
                .arg(type_arg().required(false))
                .arg(
                    arg!(--limit <N>)
                        .required(false)
                        .value_parser(value_parser!(usize)),
                ),
        ))
}

fn budgets() -> Command {
    Command::new("budget")
        .about("Monthly category budgets")
        .subcommand(
            Command::new("set")
                .arg(user_arg())
                .arg(arg!(--month <MONTH> "YYYY-MM").required(true))
                .arg(arg!(--category <CATEGORY>).required(true))
                .arg(arg!(--amount <AMOUNT>).required(true)),
        )
        .subcommand(
            Command::new("list")
                .arg(user_arg())
                .arg(arg!(--month <MONTH>).required(false)),
        )
        .subcommand(json_flags(
            Command::new("report")
                .arg(user_arg())
                .arg(arg!(--month <MONTH> "YYYY-MM").required(true)),
        ))
}

fn goals() -> Command {
    Command::new("goal")
        .about("Savings goals, contributions and feasibility analysis")
        .subcommand(
            Command::new("add")
                .arg(user_arg())
                .arg(arg!(--name <NAME>).required(true))
                .arg(arg!(--target <AMOUNT> "Target amount").required(true))
                .arg(arg!(--date <DATE> "Target date, YYYY-MM-DD").required(true))
                .arg(arg!(--contribution <AMOUNT> "Planned monthly contribution").required(false)),
        )
        .subcommand(json_flags(Command::new("list").arg(user_arg())))
        .subcommand(json_flags(
            Command::new("show").arg(arg!(--id <ID>).required(true)),
        ))
        .subcommand(
            Command::new("contribute")
                .arg(arg!(--id <ID>).required(true))
                .arg(arg!(--amount <AMOUNT>).required(true))
                .arg(arg!(--date <DATE> "Defaults to today").required(false))
                .arg(arg!(--note <NOTE>).required(false)),
        )
        .subcommand(json_flags(
            Command::new("analyze")
                .about("Feasibility report for a goal")
                .arg(arg!(--id <ID>).required(true))
                .arg(arg!(--today <DATE> "Evaluate as of this date").required(false)),
        ))
        .subcommand(Command::new("rm").arg(arg!(--id <ID>).required(true)))
}

fn reports() -> Command {
    Command::new("report")
        .about("Cashflow and spending reports")
        .subcommand(json_flags(
            Command::new("cashflow").arg(user_arg()).arg(
                arg!(--months <N>)
                    .required(false)
                    .value_parser(value_parser!(usize)),
            ),
        ))
        .subcommand(json_flags(
            Command::new("spend-by-category")
                .arg(user_arg())
                .arg(arg!(--month <MONTH> "YYYY-MM").required(true)),
        ))
}

pub fn build_cli() -> Command {
    Command::new("nestegg")
        .about("Personal finance tracker with savings-goal analysis")
        .version(clap::crate_version!())
        .arg(
            arg!(--db <PATH> "Database file")
                .required(false)
                .global(true)
                .env("NESTEGG_DB"),
        )
        .arg(
            arg!(-v --verbose "Debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("config")
                .about("Read and write settings")
                .subcommand(
                    Command::new("set")
                        .arg(arg!(--key <KEY>).required(true))
                        .arg(arg!(--value <VALUE>).required(true)),
                )
                .subcommand(Command::new("get").arg(arg!(--key <KEY>).required(true))),
        )
        .subcommand(users())
        .subcommand(categories())
        .subcommand(transactions())
        .subcommand(budgets())
        .subcommand(goals())
        .subcommand(reports())
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions")
                    .arg(user_arg())
                    .arg(arg!(--path <FILE> "CSV: date,type,amount,category,note").required(true)),
            ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(user_arg())
                    .arg(arg!(--format <FMT> "csv|json").required(true))
                    .arg(arg!(--out <FILE>).required(true)),
            ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check goals and users for problems")
                .arg(arg!(--today <DATE>).required(false)),
        )
}
