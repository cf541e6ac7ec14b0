//! Badge console: lists both partitions and issues badges from the command line
//!
//! ```text
//! cargo run -p iamc-client --example qr_console -- list
//! cargo run -p iamc-client --example qr_console -- generate static 3 5 9
//! cargo run -p iamc-client --example qr_console -- delete 3
//! cargo run -p iamc-client --example qr_console -- download 9 ./out
//! cargo run -p iamc-client --example qr_console -- template
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use iamc_client::logger::init_logger;
use iamc_client::qr::csv_template;
use iamc_client::{ClientConfig, PageMode, QrBadgeManager, SharedCollection};
use shared::Entity;
use shared::models::{Departamento, Funcionario, QrKind};

fn parse_ids(args: &[String]) -> anyhow::Result<Vec<i64>> {
    args.iter()
        .map(|a| a.parse::<i64>().with_context(|| format!("invalid employee id '{a}'")))
        .collect()
}

fn print_rows(title: &str, rows: &[&Funcionario]) {
    println!("{title} ({})", rows.len());
    for f in rows {
        let kind = f.qr_tipo.map(|k| k.to_string()).unwrap_or_else(|| "-".into());
        println!("  {:>5}  {:<30} {:<8} {}", f.id(), f.full_name(), kind, f.bi);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let config = ClientConfig::from_env();
    let gateway = Arc::new(config.build_gateway()?);
    let notifier = iamc_client::Notifier::new(config.notification_capacity);

    let mut rx = notifier.subscribe();
    tokio::spawn(async move {
        while let Ok(n) = rx.recv().await {
            eprintln!("[{:?}] {}", n.level, n.message);
        }
    });

    let manager = QrBadgeManager::new(gateway.clone(), notifier.clone()).with_page_size(config.page_size);
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("usage: qr_console <list|generate|delete|download|template|departments> ...");
    };

    match command.as_str() {
        "list" => {
            manager.refresh().await?;
            let p = manager.partitions().await;
            print_rows("Com QR", &p.with_badge().visible_rows());
            print_rows("Sem QR", &p.without_badge().visible_rows());
        }
        "generate" => {
            let kind = match args.get(1).map(String::as_str) {
                Some("static") => QrKind::Static,
                Some("dynamic") => QrKind::Dynamic,
                _ => bail!("generate needs a kind: static or dynamic"),
            };
            manager.refresh().await?;
            let outcome = manager.generate(&parse_ids(&args[2..])?, kind).await?;
            println!("succeeded: {:?}", outcome.succeeded);
            println!("failed:    {:?}", outcome.failed);
        }
        "delete" => {
            manager.refresh().await?;
            let outcome = manager.delete_many(&parse_ids(&args[1..])?).await?;
            println!("deleted: {:?}, still badged: {:?}", outcome.succeeded, outcome.failed);
        }
        "download" => {
            let id = args.get(1).context("download needs an employee id")?.parse::<i64>()?;
            let dir = args.get(2).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
            let path = manager.download(id, &dir).await?;
            println!("saved {}", path.display());
        }
        "template" => print!("{}", csv_template()),
        "departments" => {
            let view = SharedCollection::new(
                config.collection::<Departamento>(PageMode::Client, &notifier),
                gateway,
            );
            view.load().await;
            let c = view.lock().await;
            if c.is_demo() {
                println!("(dados de demonstracao)");
            }
            for d in c.visible_rows() {
                println!("  {:>3}  {}", d.id, d.nome);
            }
        }
        other => bail!("unknown command '{other}'"),
    }
    Ok(())
}
