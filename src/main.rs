use clap::{Parser, Subcommand};
use restfields::forms::{Attrs, RestForm, Widget};
use restfields::inline::InlineObjectsView;
use restfields::model::RestConfig;
use restfields::rest::{Mimer, Rc};
use restfields::{FieldSpec, FieldTree, Result, render};

use anyhow::{Context, anyhow};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "restfields")]
#[command(about = "REST field-spec toolkit", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a nested field spec into tree form.
    Tree { spec: PathBuf },

    /// Convert a field tree back into a nested field spec.
    Spec { tree: PathBuf },

    /// Union any number of field trees.
    Merge {
        #[arg(required = true)]
        trees: Vec<PathBuf>,
    },

    /// List the top-level names of a nested field spec.
    Flatten { spec: PathBuf },

    /// Resolve handler fields from a handler config.
    Fields {
        #[arg(long)]
        config: PathBuf,

        /// Only print this model's fields (`app_label.object_name`).
        #[arg(long)]
        model: Option<String>,
    },

    /// Render an inline objects listing to HTML.
    Inline {
        #[arg(long)]
        view: PathBuf,

        #[arg(short = 'o', long)]
        out: PathBuf,
    },

    /// Validate a submitted form and build its widget attributes.
    Form { form: PathBuf },

    /// Print the canned response for a status name such as `NOT_FOUND`.
    Status {
        name: String,

        /// JSON content replacing the default body.
        #[arg(long)]
        content: Option<String>,
    },

    /// Deserialize a request body according to its content type.
    Translate {
        #[arg(long)]
        content_type: Option<String>,

        body: PathBuf,
    },
}

/// inline.json: the view, its objects, and optionally a field spec that
/// supplies the columns.
#[derive(Deserialize)]
struct InlineDoc {
    view: InlineObjectsView,

    #[serde(default)]
    spec: Option<FieldSpec>,

    #[serde(default)]
    objects: Vec<Value>,
}

/// form.json: the submitted form plus per-field widgets.
#[derive(Deserialize)]
struct FormDoc {
    form: RestForm,

    #[serde(default)]
    widgets: BTreeMap<String, Widget>,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "restfields=info".into()),
        1 => tracing_subscriber::EnvFilter::new("debug"),
        _ => tracing_subscriber::EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Tree { spec } => {
            let spec: FieldSpec = read_json(&spec)?;
            print_json(&spec.to_tree())?;
        }
        Commands::Spec { tree } => {
            let tree: FieldTree = read_json(&tree)?;
            print_json(&tree.to_spec())?;
        }
        Commands::Merge { trees } => {
            let trees = trees
                .iter()
                .map(|path| read_json::<FieldTree>(path))
                .collect::<Result<Vec<_>>>()?;
            print_json(&FieldTree::merge_all(&trees))?;
        }
        Commands::Flatten { spec } => {
            let spec: FieldSpec = read_json(&spec)?;
            print_json(&spec.flatten())?;
        }
        Commands::Fields { config, model } => {
            let registry = RestConfig::load(&config)?.validate_and_build()?;
            info!(handlers = registry.len(), "loaded handler config");
            match model {
                Some(label) => {
                    let fields = registry
                        .fields_for(&label)
                        .ok_or_else(|| anyhow!("no handler exposes model {}", label))?;
                    print_json(fields)?;
                }
                None => print_json(&registry)?,
            }
        }
        Commands::Inline { view, out } => {
            let doc: InlineDoc = read_json(&view)?;
            let mut view = doc.view;
            if let Some(spec) = &doc.spec {
                let from_spec = InlineObjectsView::from_field_spec(view.name.clone(), spec);
                view.fields = from_spec.fields;
            }
            let ctx = view.context(&doc.objects);
            let html = render::render_inline(&ctx, view.layout);
            std::fs::write(&out, html).with_context(|| format!("write {}", out.display()))?;
            info!(rows = ctx.data_list.len(), "wrote {}", out.display());
        }
        Commands::Form { form } => {
            let doc: FormDoc = read_json(&form)?;
            let attrs: BTreeMap<&str, Attrs> = doc
                .widgets
                .iter()
                .map(|(field, widget)| {
                    let mut overrides = Attrs::new();
                    overrides.insert("id".to_string(), format!("id_{}", field));
                    overrides.insert("name".to_string(), field.clone());
                    (field.as_str(), widget.build_attrs(None, overrides))
                })
                .collect();
            print_json(&json!({
                "errors": doc.form.is_invalid(),
                "data": doc.form.merge_from_initial(),
                "attrs": attrs,
            }))?;
        }
        Commands::Status { name, content } => {
            let rc: Rc = name.parse()?;
            let mut response = rc.response();
            if let Some(content) = content {
                let content: Value =
                    serde_json::from_str(&content).context("parse --content as JSON")?;
                response.set_content(content);
            }
            print_json(&response)?;
        }
        Commands::Translate { content_type, body } => {
            let body = std::fs::read(&body).with_context(|| format!("read {}", body.display()))?;
            match Mimer::new().translate(content_type.as_deref(), &body) {
                Ok(translated) => print_json(&translated)?,
                Err(err) => {
                    let response = err.rc().response().with_content(json!(err.to_string()));
                    print_json(&response)?;
                    return Err(err.into());
                }
            }
        }
    }

    Ok(())
}
