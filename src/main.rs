use anyhow::{Result, bail};
use async_std::fs;
use chrono::{Local, NaiveDate};
use clap::{Arg, Command};
use haulbooks::Ledger;
use haulbooks::entry::transaction::Balance;
use haulbooks::money::Money;
use haulbooks::receipt;
use haulbooks::settings::{Settings, SettingsAction};
use haulbooks::store::Saver;
use haulbooks::summary::{Week, Window};
use std::time::Duration;

#[async_std::main]
async fn main() -> Result<()> {
    env_logger::init();
    let matches = Command::new("Haulbooks")
        .version("0.1.0")
        .about("Trip profit and budget tools for owner-operators")
        .arg(
            Arg::new("records")
                .short('r')
                .long("records")
                .help("Sets directory or file of records or '-' for stdin")
                .value_name("DIR")
                .default_value("./records")
                .takes_value(true),
        )
        .arg(
            Arg::new("settings")
                .short('s')
                .long("settings")
                .help("Driver settings file")
                .value_name("FILE")
                .default_value("./settings.yml")
                .takes_value(true),
        )
        .subcommand(Command::new("trips").about("Shows recorded trips with their cost breakdown"))
        .subcommand(
            Command::new("summary")
                .about("Shows aggregate statistics, all-time or over a date window")
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Window start, inclusive")
                        .value_name("DATE")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Window end, inclusive")
                        .value_name("DATE")
                        .takes_value(true),
                ),
        )
        .subcommand(
            Command::new("week")
                .about("Shows the Monday-start week summary around a pivot date")
                .arg(
                    Arg::new("pivot")
                        .short('p')
                        .long("pivot")
                        .help("Pivot date, defaults to today")
                        .value_name("DATE")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("offset")
                        .short('o')
                        .long("offset")
                        .help("Whole weeks to step from the pivot week")
                        .value_name("N")
                        .allow_hyphen_values(true)
                        .takes_value(true),
                ),
        )
        .subcommand(Command::new("balance").about("Shows budget balance, income, and expenses"))
        .subcommand(
            Command::new("receipt")
                .about("Totals fuel and DEF spend from receipt reader line items")
                .arg(
                    Arg::new("items")
                        .short('i')
                        .long("items")
                        .help("Receipt items file")
                        .value_name("FILE")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::new("discount")
                        .short('d')
                        .long("discount")
                        .help("Per-gallon diesel discount")
                        .value_name("RATE")
                        .default_value("0")
                        .takes_value(true),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("Shows or edits driver settings")
                .subcommand(Command::new("show").about("Prints current settings"))
                .subcommand(
                    Command::new("set")
                        .about("Sets nickname and charge rates")
                        .arg(
                            Arg::new("nickname")
                                .long("nickname")
                                .value_name("NAME")
                                .takes_value(true),
                        )
                        .arg(
                            Arg::new("rent")
                                .long("rent")
                                .help("Weekly rent charge")
                                .value_name("AMOUNT")
                                .takes_value(true),
                        )
                        .arg(
                            Arg::new("percentage")
                                .long("percentage")
                                .help("Company percentage of gross")
                                .value_name("PCT")
                                .takes_value(true),
                        )
                        .arg(
                            Arg::new("mile-rate")
                                .long("mile-rate")
                                .help("Company per-mile charge")
                                .value_name("RATE")
                                .takes_value(true),
                        ),
                )
                .subcommand(
                    Command::new("toggle")
                        .about("Toggles an expense line on or off")
                        .arg(
                            Arg::new("line")
                                .help("Standard line name or custom line id")
                                .value_name("LINE")
                                .takes_value(true)
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("amount")
                        .about("Sets an expense line amount")
                        .arg(
                            Arg::new("line")
                                .value_name("LINE")
                                .takes_value(true)
                                .required(true),
                        )
                        .arg(
                            Arg::new("amount")
                                .value_name("AMOUNT")
                                .takes_value(true)
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("add")
                        .about("Adds a custom expense line")
                        .arg(
                            Arg::new("name")
                                .value_name("NAME")
                                .takes_value(true)
                                .required(true),
                        )
                        .arg(
                            Arg::new("amount")
                                .value_name("AMOUNT")
                                .takes_value(true)
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("remove")
                        .about("Removes a custom expense line")
                        .arg(
                            Arg::new("id")
                                .value_name("ID")
                                .takes_value(true)
                                .required(true),
                        ),
                ),
        )
        .get_matches();

    let settings_path = matches.value_of("settings").unwrap_or("./settings.yml");
    let settings = Settings::load_or_default(settings_path).await?;
    let ledger = match matches.value_of("records") {
        Some("-") => Ledger::new(None),
        Some(records) => Ledger::new(Some(records)),
        None => Ledger::new(Some("./records")),
    };

    if matches.subcommand_matches("trips").is_some() {
        let reports = ledger.trip_reports(&settings).await?;
        println!(
            "{:<10} | {:<28} | {:>10} | {:>10} | {:>10} | {:>7}",
            "Date", "Route", "Gross", "Expenses", "Net", "RPM"
        );
        for report in reports {
            println!("{report}");
        }
    } else if let Some(summary_args) = matches.subcommand_matches("summary") {
        let from = summary_args
            .value_of("from")
            .map(str::parse::<NaiveDate>)
            .transpose()?;
        let to = summary_args
            .value_of("to")
            .map(str::parse::<NaiveDate>)
            .transpose()?;
        let summary = ledger
            .summary(&settings, &Window::between(from, to))
            .await?;
        println!("{summary}");
    } else if let Some(week_args) = matches.subcommand_matches("week") {
        let pivot = week_args
            .value_of("pivot")
            .map(str::parse::<NaiveDate>)
            .transpose()?
            .unwrap_or_else(|| Local::now().date_naive());
        let offset = week_args
            .value_of("offset")
            .map(str::parse::<i64>)
            .transpose()?
            .unwrap_or(0);
        let week = Week::containing(pivot).offset(offset);
        let summary = ledger.week_summary(&settings, &week).await?;
        println!("{}", week.label());
        println!("{summary}");
    } else if matches.subcommand_matches("balance").is_some() {
        let transactions = ledger.transactions().await?;
        println!("{}", Balance::of(&transactions));
        if !transactions.is_empty() {
            println!();
            for tx in transactions {
                println!("{tx}");
            }
        }
    } else if let Some(receipt_args) = matches.subcommand_matches("receipt") {
        let items_file = receipt_args.value_of("items").unwrap(); // required
        let discount: Money = receipt_args.value_of("discount").unwrap_or("0").parse()?;
        let doc = fs::read_to_string(items_file).await?;
        let items = receipt::items_from_doc(&doc)?;
        let expense = receipt::fuel_expense(&items, discount)?;
        println!("{expense}");
    } else if let Some(settings_args) = matches.subcommand_matches("settings") {
        let mut actions = Vec::new();
        match settings_args.subcommand() {
            Some(("set", set_args)) => {
                if let Some(nickname) = set_args.value_of("nickname") {
                    actions.push(SettingsAction::SetNickname(nickname.to_owned()));
                }
                if let Some(rent) = set_args.value_of("rent") {
                    actions.push(SettingsAction::SetRentPerWeek(rent.parse()?));
                }
                if let Some(pct) = set_args.value_of("percentage") {
                    actions.push(SettingsAction::SetPercentageFromGross(pct.parse()?));
                }
                if let Some(rate) = set_args.value_of("mile-rate") {
                    actions.push(SettingsAction::SetRatePerMile(rate.parse()?));
                }
            }
            Some(("toggle", toggle_args)) => {
                let line = toggle_args.value_of("line").unwrap(); // required
                if !settings.has_line(line) {
                    bail!("No expense line named '{}'", line);
                }
                actions.push(SettingsAction::ToggleExpense(line.to_owned()));
            }
            Some(("amount", amount_args)) => {
                let line = amount_args.value_of("line").unwrap(); // required
                if !settings.has_line(line) {
                    bail!("No expense line named '{}'", line);
                }
                actions.push(SettingsAction::SetExpenseAmount(
                    line.to_owned(),
                    amount_args.value_of("amount").unwrap().parse()?, // required
                ));
            }
            Some(("add", add_args)) => {
                actions.push(SettingsAction::AddCustomExpense {
                    name: add_args.value_of("name").unwrap().to_owned(), // required
                    amount: add_args.value_of("amount").unwrap().parse()?, // required
                });
            }
            Some(("remove", remove_args)) => {
                let id = remove_args.value_of("id").unwrap(); // required
                if !settings.has_line(id) {
                    bail!("No custom expense line with id '{}'", id);
                }
                actions.push(SettingsAction::RemoveCustomExpense(id.to_owned()));
            }
            _ => {}
        }
        if actions.is_empty() {
            print!("{}", settings.to_doc()?);
        } else {
            let saver = Saver::new(settings_path, Duration::from_millis(500));
            let updated = actions
                .into_iter()
                .fold(settings, |settings, action| settings.apply(action));
            saver.queue(&updated).await?;
            saver.flush().await?;
            print!("{}", updated.to_doc()?);
        }
    }
    Ok(())
}
