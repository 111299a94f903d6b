use clap::{command, value_parser, Arg, ArgAction, ArgMatches, Command};
use context::{Context, DEFAULT_BLOG_NAME, DEFAULT_OUTPUT, DEFAULT_POSTS_DIR};
use std::path::PathBuf;

mod context;
mod frontmatter;
mod generator;
mod index;
mod metadata;
mod renderer;

fn path_arg(matches: &ArgMatches, id: &str, default: &str) -> PathBuf {
    matches
        .get_one::<PathBuf>(id)
        .cloned()
        .unwrap_or_else(|| PathBuf::from(default))
}

fn build_context(matches: &ArgMatches) -> Context {
    Context::new(
        path_arg(matches, "posts_dir", DEFAULT_POSTS_DIR),
        path_arg(matches, "output", DEFAULT_OUTPUT),
        std::env::var("BLOG_NAME").unwrap_or(DEFAULT_BLOG_NAME.to_string()),
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = command!()
        .args(&[
            Arg::new("posts_dir")
                .long("posts-dir")
                .help("Directory path of markdown posts")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_POSTS_DIR)
                .global(true),
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Path of the post index. Existing file will be overwritten.")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_OUTPUT)
                .global(true),
        ])
        .subcommand(Command::new("list").about("Print the indexed posts, newest date first"))
        .subcommand(
            Command::new("show")
                .about("Print one indexed post")
                .args(&[
                    Arg::new("id").help("Id of the post").required(true),
                    Arg::new("html")
                        .long("html")
                        .help("Render a standalone HTML page instead of the markdown body")
                        .action(ArgAction::SetTrue),
                ]),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("list", sub)) => {
            let ctx = build_context(sub);
            let index = index::load_index(&ctx.output)?;
            print!("{}", renderer::render_list(&index.posts));
        }
        Some(("show", sub)) => {
            let ctx = build_context(sub);
            let id = sub.get_one::<String>("id").map_or("", String::as_str);
            print!("{}", renderer::render_post(&ctx, id, sub.get_flag("html"))?);
        }
        _ => {
            let ctx = build_context(&matches);
            generator::generate(&ctx)?;
        }
    }

    Ok(())
}
