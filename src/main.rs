use cardwallet::cli::{
    handle_add_card, handle_add_note, handle_delete, handle_export, handle_favorite,
    handle_field_add, handle_field_remove, handle_import, handle_init, handle_list,
    handle_search, handle_show, AddRecord, Cli, Commands, FieldAction,
};
use cardwallet::CodecConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = CodecConfig::load(cli.config.as_deref()).and_then(|config| {
        let file = cli.file.as_path();
        match cli.command {
            Commands::Init => handle_init(file, config),
            Commands::Add(add) => match add.record {
                AddRecord::Card {
                    name,
                    record_type,
                    picture,
                    fields,
                    note,
                    json,
                } => handle_add_card(file, config, name, record_type, picture, fields, note, json),
                AddRecord::Note {
                    name,
                    text,
                    stdin,
                    json,
                } => handle_add_note(file, config, name, text, stdin, json),
            },
            Commands::List {
                favorites,
                class,
                json,
            } => handle_list(file, config, favorites, class, json),
            Commands::Show { id, json } => handle_show(file, config, id, json),
            Commands::Field(field_cmd) => match field_cmd.action {
                FieldAction::Add {
                    id,
                    name,
                    field_type,
                    value,
                } => handle_field_add(file, config, id, name, field_type, value),
                FieldAction::Remove { id, name } => handle_field_remove(file, config, id, name),
            },
            Commands::Favorite { id } => handle_favorite(file, config, id),
            Commands::Delete { id } => handle_delete(file, config, id),
            Commands::Search { query, class, json } => {
                handle_search(file, config, query, class, json)
            }
            Commands::Export => handle_export(file, config),
            Commands::Import { source } => handle_import(file, config, &source),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
