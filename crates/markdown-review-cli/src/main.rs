use anyhow::{Context, Result};
use markdown_review_config::Config;
use markdown_review_engine::annotations::{
    StripMode, StripOptions, accept_all, reject_all, strip_annotations,
};
use markdown_review_engine::{
    AnnotationRenderer, DiffOptions, DocumentStore, Element, ElementMetadata, StoreOptions,
};
use markdown_review_syntax::parse;
use std::{env, fs, path::PathBuf, process};

const USAGE: &str = "\
Commands:
  diff <old> <new>      print <new> with changes since <old> as CriticMarkup
  accept <file>         print <file> with every annotation accepted
  reject <file>         print <file> with every annotation rejected
  clean <file>          like accept, honouring export.preserve_comments
  spans <file>          list the annotations found in <file>
  summary <old> <new>   print review statistics for the edit <old> -> <new>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Diff { old: PathBuf, new: PathBuf },
    Accept(PathBuf),
    Reject(PathBuf),
    Clean(PathBuf),
    Spans(PathBuf),
    Summary { old: PathBuf, new: PathBuf },
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        let path = |i: usize| args.get(i).map(PathBuf::from);
        let command = match (args.first()?.as_str(), args.len()) {
            ("diff", 3) => Command::Diff {
                old: path(1)?,
                new: path(2)?,
            },
            ("summary", 3) => Command::Summary {
                old: path(1)?,
                new: path(2)?,
            },
            ("accept", 2) => Command::Accept(path(1)?),
            ("reject", 2) => Command::Reject(path(1)?),
            ("clean", 2) => Command::Clean(path(1)?),
            ("spans", 2) => Command::Spans(path(1)?),
            _ => return None,
        };
        Some(command)
    }
}

/// Program name and command arguments. argv may be empty.
fn split_program(args: &[String]) -> (&str, &[String]) {
    match args.split_first() {
        Some((program, rest)) => (program.as_str(), rest),
        None => ("markdown-review-cli", &[]),
    }
}

fn store_options(config: &Config) -> StoreOptions {
    let mut diff = DiffOptions::default().with_ignore_case(config.diff.ignore_case);
    if let Some(timeout) = config.diff.timeout() {
        diff = diff.with_timeout(timeout);
    }
    if let Some(max) = config.diff.max_edit_length {
        diff = diff.with_max_edit_length(max);
    }
    StoreOptions {
        diff,
        normalize_whitespace: config.render.normalize_whitespace,
        preserve_comments: config.export.preserve_comments,
        ..StoreOptions::default()
    }
}

fn read(path: &PathBuf) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn run(command: &Command, config: &Config) -> Result<String> {
    let options = store_options(config);
    let output = match command {
        Command::Diff { old, new } => AnnotationRenderer::new(options.diff.clone())
            .with_tie_break(options.tie_break)
            .render(&read(old)?, &read(new)?),
        Command::Accept(path) => accept_all(&read(path)?),
        Command::Reject(path) => reject_all(&read(path)?),
        Command::Clean(path) => strip_annotations(
            &read(path)?,
            StripMode::Accept,
            StripOptions {
                preserve_comments_as_html: options.preserve_comments,
            },
        ),
        Command::Spans(path) => {
            let text = read(path)?;
            let mut out = String::new();
            for span in parse(&text) {
                out.push_str(&format!(
                    "{}..{}\t{}\t{:?}",
                    span.start,
                    span.end,
                    span.kind.name(),
                    span.content
                ));
                if let Some(replacement) = &span.replacement {
                    out.push_str(&format!(" -> {replacement:?}"));
                }
                if let Some(comment) = &span.comment {
                    out.push_str(&format!(" // {comment:?}"));
                }
                out.push('\n');
            }
            out
        }
        Command::Summary { old, new } => {
            let element = Element::new("document", read(old)?, ElementMetadata::new("document"));
            let mut store = DocumentStore::with_options(vec![element], options)?;
            store.edit("document", read(new)?, config.user_id.clone(), None)?;

            let summary = store.change_summary();
            format!(
                "{}\nadditions: {}\ndeletions: {}\nsubstitutions: {}\ncharacters added: {}\ncharacters removed: {}\ncomments: {}\n",
                store.summarize_operations(),
                summary.additions,
                summary.deletions,
                summary.substitutions,
                summary.characters_added,
                summary.characters_removed,
                summary.comments
            )
        }
    };
    Ok(output)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let (program, rest) = split_program(&args);
    let Some(command) = Command::parse(rest) else {
        eprintln!("Usage: {program} <command> <file>...");
        eprintln!("{USAGE}");
        process::exit(1);
    };

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };
    log::debug!("running {command:?}");

    print!("{}", run(&command, &config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse(&args(&["diff", "a.md", "b.md"])),
            Some(Command::Diff {
                old: PathBuf::from("a.md"),
                new: PathBuf::from("b.md")
            })
        );
        assert_eq!(
            Command::parse(&args(&["spans", "a.md"])),
            Some(Command::Spans(PathBuf::from("a.md")))
        );
        assert_eq!(Command::parse(&args(&["diff", "a.md"])), None);
        assert_eq!(Command::parse(&args(&["explode", "a.md"])), None);
        assert_eq!(Command::parse(&[]), None);
    }

    #[test]
    fn test_split_program_handles_empty_argv() {
        let (program, rest) = split_program(&[]);
        assert_eq!(program, "markdown-review-cli");
        assert!(rest.is_empty());

        let argv = args(&["/usr/bin/mr", "spans", "a.md"]);
        let (program, rest) = split_program(&argv);
        assert_eq!(program, "/usr/bin/mr");
        assert_eq!(Command::parse(rest), Some(Command::Spans(PathBuf::from("a.md"))));
    }

    #[test]
    fn test_diff_then_accept_and_reject() {
        let dir = TempDir::new().unwrap();
        let old = write(&dir, "old.md", "- Alpha\n- Beta\n- Gamma\n");
        let new = write(&dir, "new.md", "- Alpha\n- Beta2\n- Gamma\n");
        let config = Config::default();

        let tracked = run(&Command::Diff { old, new }, &config).unwrap();
        assert_eq!(tracked, "- Alpha\n- {~~Beta~>Beta2~~}\n- Gamma\n");

        let annotated = write(&dir, "tracked.md", &tracked);
        assert_eq!(
            run(&Command::Accept(annotated.clone()), &config).unwrap(),
            "- Alpha\n- Beta2\n- Gamma\n"
        );
        assert_eq!(
            run(&Command::Reject(annotated), &config).unwrap(),
            "- Alpha\n- Beta\n- Gamma\n"
        );
    }

    #[test]
    fn test_clean_honours_preserve_comments() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "notes.md", "Claim{>>source?<<}.");

        let mut config = Config::default();
        assert_eq!(run(&Command::Clean(file.clone()), &config).unwrap(), "Claim.");

        config.export.preserve_comments = true;
        assert_eq!(
            run(&Command::Clean(file), &config).unwrap(),
            "Claim<!-- review-comment source? -->."
        );
    }

    #[test]
    fn test_spans_listing() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "notes.md", "a {++b++} {~~c~>d~~}");

        assert_eq!(
            run(&Command::Spans(file), &Config::default()).unwrap(),
            "2..9\taddition\t\"b\"\n10..20\tsubstitution\t\"c\" -> \"d\"\n"
        );
    }

    #[test]
    fn test_summary() {
        let dir = TempDir::new().unwrap();
        let old = write(&dir, "old.md", "Hello wrld\n");
        let new = write(&dir, "new.md", "Hello world\n");

        let summary = run(&Command::Summary { old, new }, &Config::default()).unwrap();
        assert_eq!(
            summary,
            "Edited 1 element(s)\nadditions: 1\ndeletions: 0\nsubstitutions: 0\ncharacters added: 1\ncharacters removed: 0\ncomments: 0\n"
        );
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = run(
            &Command::Accept(PathBuf::from("/definitely/not/here.md")),
            &Config::default(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Failed to read /definitely/not/here.md"));
    }
}
