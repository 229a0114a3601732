//! Clap command tree definition.
//!
//! Builds the full `clap::Command` tree for the `schooldesk` admin tool.

use clap::{Arg, ArgAction, Command};

/// Default store root when neither `--root` nor `SCHOOLDESK_ROOT` is set.
pub const DEFAULT_ROOT: &str = "lib/Games";

const COLLECTIONS: [&str; 3] = ["games", "assistants", "homework"];

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("schooldesk")
        .about("Admin tool for the schooldesk local document store")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("root")
                .long("root")
                .env("SCHOOLDESK_ROOT")
                .help("Store root directory")
                .default_value(DEFAULT_ROOT)
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Raise log level (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(build_add())
        .subcommand(build_patch())
        .subcommand(build_show())
        .subcommand(build_list())
        .subcommand(build_delete())
        .subcommand(
            Command::new("hide")
                .about("Hide a document id from listings")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(
            Command::new("unhide")
                .about("Remove an id from the hidden set")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(Command::new("hidden").about("List hidden ids"))
        .subcommand(Command::new("stats").about("Document counts per collection"))
}

fn collection_arg() -> Arg {
    Arg::new("collection")
        .required(true)
        .value_parser(COLLECTIONS)
        .help("Collection name")
}

fn document_field_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("title").long("title").help("Document title"))
        .arg(
            Arg::new("description")
                .long("description")
                .help("Document description"),
        )
        .arg(
            Arg::new("payload")
                .long("payload")
                .help("Payload text (html, embedHtml or description by collection)")
                .conflicts_with("payload-file"),
        )
        .arg(
            Arg::new("payload-file")
                .long("payload-file")
                .help("Read the payload from a file ('-' for stdin)"),
        )
        .arg(
            Arg::new("by")
                .long("by")
                .help("Author recorded as createdBy"),
        )
        .arg(
            Arg::new("field")
                .long("field")
                .short('f')
                .help("Extra field as key=value (repeatable)")
                .action(ArgAction::Append),
        )
}

fn build_add() -> Command {
    document_field_args(
        Command::new("add")
            .about("Create or replace a document")
            .arg(collection_arg())
            .arg(
                Arg::new("id")
                    .help("Document id (games/assistants: slugified, defaults to the title)"),
            ),
    )
}

fn build_patch() -> Command {
    document_field_args(
        Command::new("patch")
            .about("Merge fields into a document")
            .arg(collection_arg())
            .arg(Arg::new("id").required(true)),
    )
}

fn build_show() -> Command {
    Command::new("show")
        .about("Print one document")
        .arg(collection_arg())
        .arg(Arg::new("id").required(true))
}

fn build_list() -> Command {
    Command::new("list")
        .about("List a collection, newest first")
        .arg(collection_arg())
        .arg(
            Arg::new("order-by")
                .long("order-by")
                .default_value("createdAt")
                .help("Numeric field to sort on"),
        )
        .arg(
            Arg::new("asc")
                .long("asc")
                .help("Oldest first")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("where")
                .long("where")
                .short('w')
                .help("Equality filter as key=value (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("all")
                .long("all")
                .help("Include hidden ids")
                .action(ArgAction::SetTrue),
        )
}

fn build_delete() -> Command {
    Command::new("delete")
        .about("Delete a document")
        .arg(collection_arg())
        .arg(Arg::new("id").required(true))
}
