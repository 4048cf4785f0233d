//! Subcommands and their handlers.
//!
//! Everything except import/export goes through the [`CoffeeStore`] trait, the
//! same contract a graphical front-end would use.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use brewlog_core::{
  bean::{CoffeeBeanPatch, NewCoffeeBean, RoastLevel},
  png::PngImage,
  rating::Rating,
  session::{BrewingSessionPatch, NewBrewingSession},
  store::CoffeeStore,
};
use brewlog_store_sqlite::SqliteStore;
use clap::{Args, Subcommand, ValueEnum};

use crate::output;

// ─── Command tree ─────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Catalogue coffee beans.
  #[command(subcommand)]
  Bean(BeanCommand),

  /// Log brewing sessions.
  #[command(subcommand)]
  Session(SessionCommand),

  /// Show aggregate statistics over the whole journal.
  Stats {
    #[arg(long)]
    json: bool,
  },

  /// Write a copy of the journal to FILE.
  Export { file: PathBuf },

  /// Replace the journal with the contents of FILE.
  Import {
    file: PathBuf,

    /// Confirm that the current journal will be overwritten.
    #[arg(long)]
    yes: bool,
  },
}

#[derive(Subcommand, Debug)]
pub enum BeanCommand {
  /// Add a bean.
  Add {
    name: String,
    #[command(flatten)]
    fields: BeanFields,
  },
  /// List all beans, newest first.
  List {
    #[arg(long)]
    json: bool,
  },
  /// Show one bean and its sessions.
  Show {
    id: i64,
    /// Write the bean's PNG image to FILE.
    #[arg(long, value_name = "FILE")]
    save_image: Option<PathBuf>,
  },
  /// Change some fields of a bean.
  Edit {
    id: i64,
    #[arg(long)]
    name: Option<String>,
    #[command(flatten)]
    fields: BeanFields,
    /// Remove a stored value.
    #[arg(long, value_enum)]
    clear: Vec<BeanField>,
  },
  /// Delete a bean and all of its sessions.
  Rm { id: i64 },
  /// Find beans by name, roaster, origin or tasting notes.
  Search {
    query: String,
    #[arg(long)]
    json: bool,
  },
}

#[derive(Args, Debug, Default)]
pub struct BeanFields {
  #[arg(long)]
  roaster: Option<String>,
  /// Light, Medium or Dark.
  #[arg(long)]
  roast: Option<RoastLevel>,
  #[arg(long)]
  origin: Option<String>,
  /// Processing method, e.g. washed or natural.
  #[arg(long)]
  process: Option<String>,
  /// Tasting notes.
  #[arg(long)]
  notes: Option<String>,
  /// 0–5; 0 means unrated.
  #[arg(long)]
  rating: Option<f64>,
  #[arg(long)]
  price: Option<f64>,
  /// Purchase date, free text.
  #[arg(long)]
  purchased: Option<String>,
  /// Picture of the bag in any common format; stored as PNG.
  #[arg(long, value_name = "FILE")]
  image: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BeanField {
  Roaster,
  Origin,
  Process,
  Notes,
  Rating,
  Purchased,
  Image,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
  /// Log a session for a bean.
  Add {
    bean_id: i64,
    method: String,
    #[command(flatten)]
    fields: SessionFields,
  },
  /// List all sessions, newest first.
  List {
    /// Only sessions brewed from this bean.
    #[arg(long)]
    bean: Option<i64>,
    #[arg(long)]
    json: bool,
  },
  Show { id: i64 },
  /// Change some fields of a session.
  Edit {
    id: i64,
    /// Move the session to another bean.
    #[arg(long)]
    bean: Option<i64>,
    #[arg(long)]
    method: Option<String>,
    #[command(flatten)]
    fields: SessionFields,
    /// Remove a stored value.
    #[arg(long, value_enum)]
    clear: Vec<SessionField>,
  },
  Rm { id: i64 },
  /// Find sessions by bean name, brew method or notes.
  Search {
    query: String,
    #[arg(long)]
    json: bool,
  },
}

#[derive(Args, Debug, Default)]
pub struct SessionFields {
  #[arg(long)]
  grind: Option<String>,
  /// Water temperature in °C.
  #[arg(long)]
  temp: Option<i64>,
  /// Brew time in seconds.
  #[arg(long)]
  time: Option<i64>,
  /// Coffee dose in grams.
  #[arg(long)]
  coffee: Option<f64>,
  /// Water in grams.
  #[arg(long)]
  water: Option<f64>,
  /// 0–5; 0 means unrated.
  #[arg(long)]
  rating: Option<f64>,
  #[arg(long)]
  notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SessionField {
  Grind,
  Temp,
  Time,
  Coffee,
  Water,
  Rating,
  Notes,
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

pub async fn run(store: SqliteStore, command: Command) -> anyhow::Result<()> {
  match command {
    Command::Bean(cmd) => bean(&store, cmd).await,
    Command::Session(cmd) => session(&store, cmd).await,
    Command::Stats { json } => {
      let stats = store.get_detailed_statistics().await.context("reading statistics")?;
      if json {
        println!("{}", output::json(&stats)?);
      } else {
        println!("{stats}");
      }
      Ok(())
    }
    Command::Export { file } => {
      store
        .export_to(&file)
        .await
        .with_context(|| format!("exporting to {}", file.display()))?;
      println!("Exported journal to {}", file.display());
      Ok(())
    }
    Command::Import { file, yes } => {
      if !yes {
        bail!("import replaces the current journal; re-run with --yes to confirm");
      }
      let store = store
        .import_from(&file)
        .await
        .with_context(|| format!("importing {}", file.display()))?;
      let stats = store.get_detailed_statistics().await?;
      println!(
        "Imported {} beans and {} sessions from {}",
        stats.total_beans,
        stats.total_sessions,
        file.display()
      );
      Ok(())
    }
  }
}

async fn bean<S: CoffeeStore>(store: &S, cmd: BeanCommand) -> anyhow::Result<()> {
  match cmd {
    BeanCommand::Add { name, fields } => {
      let bean = new_bean(name, fields).await?;
      let id = store.add_coffee_bean(bean).await.context("adding bean")?;
      println!("Added bean #{id}");
    }
    BeanCommand::List { json } => {
      let beans = store.get_all_coffee_beans().await.context("listing beans")?;
      print_beans(&beans, json)?;
    }
    BeanCommand::Show { id, save_image } => {
      let Some(bean) = store.get_coffee_bean(id).await.context("reading bean")? else {
        bail!("no bean #{id}");
      };
      println!("{}", output::bean_detail(&bean));

      let sessions = store.get_sessions_for_bean(id).await.context("reading sessions")?;
      if !sessions.is_empty() {
        println!();
        print!("{}", output::session_table(&sessions));
      }

      if let Some(dest) = save_image {
        let Some(png) = bean.image else {
          bail!("bean #{id} has no image");
        };
        tokio::fs::write(&dest, png.as_bytes())
          .await
          .with_context(|| format!("writing {}", dest.display()))?;
        println!("Saved image to {}", dest.display());
      }
    }
    BeanCommand::Edit { id, name, fields, clear } => {
      let patch = bean_patch(name, fields, &clear).await?;
      if patch.is_empty() {
        bail!("nothing to change for bean #{id}; pass a field flag or --clear");
      }
      if store.update_coffee_bean(id, patch).await.context("updating bean")? {
        println!("Updated bean #{id}");
      } else {
        bail!("no bean #{id}");
      }
    }
    BeanCommand::Rm { id } => {
      if store.delete_coffee_bean(id).await.context("deleting bean")? {
        println!("Deleted bean #{id} and its sessions");
      } else {
        println!("No bean #{id}; nothing to delete");
      }
    }
    BeanCommand::Search { query, json } => {
      let beans = store.search_coffee_beans(&query).await.context("searching beans")?;
      print_beans(&beans, json)?;
    }
  }
  Ok(())
}

async fn session<S: CoffeeStore>(store: &S, cmd: SessionCommand) -> anyhow::Result<()> {
  match cmd {
    SessionCommand::Add { bean_id, method, fields } => {
      let session = new_session(bean_id, method, fields)?;
      let id = store
        .add_brewing_session(session)
        .await
        .with_context(|| format!("adding session for bean #{bean_id}"))?;
      println!("Logged session #{id}");
    }
    SessionCommand::List { bean, json } => {
      let sessions = match bean {
        Some(bean_id) => store.get_sessions_for_bean(bean_id).await,
        None => store.get_all_brewing_sessions().await,
      }
      .context("listing sessions")?;
      print_sessions(&sessions, json)?;
    }
    SessionCommand::Show { id } => {
      let Some(session) = store.get_brewing_session(id).await.context("reading session")? else {
        bail!("no session #{id}");
      };
      println!("{}", output::session_detail(&session));
    }
    SessionCommand::Edit { id, bean, method, fields, clear } => {
      let patch = session_patch(bean, method, fields, &clear)?;
      if patch.is_empty() {
        bail!("nothing to change for session #{id}; pass a field flag or --clear");
      }
      if store.update_brewing_session(id, patch).await.context("updating session")? {
        println!("Updated session #{id}");
      } else {
        bail!("no session #{id}");
      }
    }
    SessionCommand::Rm { id } => {
      if store.delete_brewing_session(id).await.context("deleting session")? {
        println!("Deleted session #{id}");
      } else {
        println!("No session #{id}; nothing to delete");
      }
    }
    SessionCommand::Search { query, json } => {
      let sessions = store
        .search_brewing_sessions(&query)
        .await
        .context("searching sessions")?;
      print_sessions(&sessions, json)?;
    }
  }
  Ok(())
}

// ─── Payload builders ─────────────────────────────────────────────────────────

fn print_beans(beans: &[brewlog_core::bean::CoffeeBean], json: bool) -> anyhow::Result<()> {
  if json {
    println!("{}", output::json(beans)?);
  } else {
    print!("{}", output::bean_table(beans));
  }
  Ok(())
}

fn print_sessions(
  sessions: &[brewlog_core::session::BrewingSessionWithBean],
  json: bool,
) -> anyhow::Result<()> {
  if json {
    println!("{}", output::json(sessions)?);
  } else {
    print!("{}", output::session_table(sessions));
  }
  Ok(())
}

fn score(raw: Option<f64>) -> anyhow::Result<Option<Option<Rating>>> {
  raw.map(Rating::from_score).transpose().context("invalid rating")
}

/// Read a picture and re-encode it as PNG. An unreadable picture is stored as
/// "no image" and only logged.
async fn load_image(path: &Path) -> anyhow::Result<Option<PngImage>> {
  let bytes = tokio::fs::read(path)
    .await
    .with_context(|| format!("reading {}", path.display()))?;
  Ok(PngImage::encode_lossy(&bytes))
}

async fn new_bean(name: String, f: BeanFields) -> anyhow::Result<NewCoffeeBean> {
  let image = match &f.image {
    Some(path) => load_image(path).await?,
    None => None,
  };
  Ok(NewCoffeeBean {
    roaster: f.roaster,
    roast_level: f.roast.unwrap_or_default(),
    origin: f.origin,
    processing_method: f.process,
    tasting_notes: f.notes,
    rating: score(f.rating)?.flatten(),
    price: f.price.unwrap_or(0.0),
    purchase_date: f.purchased,
    image,
    ..NewCoffeeBean::new(name)?
  })
}

async fn bean_patch(
  name: Option<String>,
  f: BeanFields,
  clear: &[BeanField],
) -> anyhow::Result<CoffeeBeanPatch> {
  let image = match &f.image {
    Some(path) => Some(load_image(path).await?),
    None => None,
  };
  let mut patch = CoffeeBeanPatch {
    name,
    roaster: f.roaster.map(Some),
    roast_level: f.roast,
    origin: f.origin.map(Some),
    processing_method: f.process.map(Some),
    tasting_notes: f.notes.map(Some),
    rating: score(f.rating)?,
    price: f.price,
    purchase_date: f.purchased.map(Some),
    image,
  };
  for field in clear {
    match field {
      BeanField::Roaster => patch.roaster = Some(None),
      BeanField::Origin => patch.origin = Some(None),
      BeanField::Process => patch.processing_method = Some(None),
      BeanField::Notes => patch.tasting_notes = Some(None),
      BeanField::Rating => patch.rating = Some(None),
      BeanField::Purchased => patch.purchase_date = Some(None),
      BeanField::Image => patch.image = Some(None),
    }
  }
  Ok(patch)
}

fn new_session(bean_id: i64, method: String, f: SessionFields) -> anyhow::Result<NewBrewingSession> {
  Ok(NewBrewingSession {
    grind_size: f.grind,
    water_temp_c: f.temp,
    brew_time_sec: f.time,
    coffee_weight_g: f.coffee,
    water_weight_g: f.water,
    rating: score(f.rating)?.flatten(),
    notes: f.notes,
    ..NewBrewingSession::new(bean_id, method)?
  })
}

fn session_patch(
  bean: Option<i64>,
  method: Option<String>,
  f: SessionFields,
  clear: &[SessionField],
) -> anyhow::Result<BrewingSessionPatch> {
  let mut patch = BrewingSessionPatch {
    coffee_bean_id: bean,
    brew_method: method,
    grind_size: f.grind.map(Some),
    water_temp_c: f.temp.map(Some),
    brew_time_sec: f.time.map(Some),
    coffee_weight_g: f.coffee.map(Some),
    water_weight_g: f.water.map(Some),
    rating: score(f.rating)?,
    notes: f.notes.map(Some),
  };
  for field in clear {
    match field {
      SessionField::Grind => patch.grind_size = Some(None),
      SessionField::Temp => patch.water_temp_c = Some(None),
      SessionField::Time => patch.brew_time_sec = Some(None),
      SessionField::Coffee => patch.coffee_weight_g = Some(None),
      SessionField::Water => patch.water_weight_g = Some(None),
      SessionField::Rating => patch.rating = Some(None),
      SessionField::Notes => patch.notes = Some(None),
    }
  }
  Ok(patch)
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;

  #[derive(Parser)]
  struct TestCli {
    #[command(subcommand)]
    command: Command,
  }

  fn parse(args: &[&str]) -> Command {
    TestCli::try_parse_from(std::iter::once("brewlog").chain(args.iter().copied()))
      .unwrap()
      .command
  }

  #[tokio::test]
  async fn bean_add_flags_become_payload() {
    let Command::Bean(BeanCommand::Add { name, fields }) = parse(&[
      "bean", "add", "Yirgacheffe", "--roast", "light", "--rating", "4.8", "--price", "650",
    ]) else {
      panic!("wrong command");
    };
    let bean = new_bean(name, fields).await.unwrap();
    assert_eq!(bean.name, "Yirgacheffe");
    assert_eq!(bean.roast_level, RoastLevel::Light);
    assert_eq!(bean.rating.map(Rating::value), Some(4.8));
    assert_eq!(bean.price, 650.0);
    assert!(bean.roaster.is_none());
  }

  #[tokio::test]
  async fn zero_rating_flag_means_unrated() {
    let Command::Bean(BeanCommand::Add { name, fields }) =
      parse(&["bean", "add", "House", "--rating", "0"])
    else {
      panic!("wrong command");
    };
    assert!(new_bean(name, fields).await.unwrap().rating.is_none());
  }

  #[tokio::test]
  async fn bean_edit_builds_partial_patch() {
    let Command::Bean(BeanCommand::Edit { name, fields, clear, .. }) =
      parse(&["bean", "edit", "3", "--price", "12.5", "--clear", "roaster", "--clear", "image"])
    else {
      panic!("wrong command");
    };
    let patch = bean_patch(name, fields, &clear).await.unwrap();
    assert_eq!(patch.price, Some(12.5));
    assert_eq!(patch.roaster, Some(None));
    assert_eq!(patch.image, Some(None));
    assert_eq!(patch.name, None);
    assert_eq!(patch.origin, None);
  }

  #[test]
  fn session_edit_can_move_and_clear() {
    let Command::Session(SessionCommand::Edit { bean, method, fields, clear, .. }) =
      parse(&["session", "edit", "5", "--bean", "2", "--temp", "95", "--clear", "notes"])
    else {
      panic!("wrong command");
    };
    let patch = session_patch(bean, method, fields, &clear).unwrap();
    assert_eq!(patch.coffee_bean_id, Some(2));
    assert_eq!(patch.water_temp_c, Some(Some(95)));
    assert_eq!(patch.notes, Some(None));
    assert!(patch.brew_method.is_none());
  }

  #[test]
  fn out_of_range_rating_is_rejected() {
    let Command::Session(SessionCommand::Add { bean_id, method, fields }) =
      parse(&["session", "add", "1", "V60", "--rating", "6"])
    else {
      panic!("wrong command");
    };
    assert!(new_session(bean_id, method, fields).is_err());
  }

  #[tokio::test]
  async fn edit_without_changes_is_refused() {
    let store = SqliteStore::open_in_memory().await.unwrap();

    let Command::Bean(cmd) = parse(&["bean", "edit", "999"]) else {
      panic!("wrong command");
    };
    let err = bean(&store, cmd).await.unwrap_err();
    assert!(err.to_string().contains("nothing to change"), "got: {err}");

    let Command::Session(cmd) = parse(&["session", "edit", "999"]) else {
      panic!("wrong command");
    };
    let err = session(&store, cmd).await.unwrap_err();
    assert!(err.to_string().contains("nothing to change"), "got: {err}");
  }

  #[tokio::test]
  async fn edit_of_missing_bean_is_an_error() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let Command::Bean(cmd) = parse(&["bean", "edit", "999", "--price", "10"]) else {
      panic!("wrong command");
    };
    let err = bean(&store, cmd).await.unwrap_err();
    assert!(err.to_string().contains("no bean #999"), "got: {err}");
  }

  #[test]
  fn unknown_roast_level_is_a_usage_error() {
    let result = TestCli::try_parse_from(["brewlog", "bean", "add", "X", "--roast", "blonde"]);
    assert!(result.is_err());
  }
}
