// File: crates/demo/src/main.rs
// Summary: Demo wiring a pie, a heatmap, and a scatter plot over one transaction
// table; interactions on any chart narrow all three.

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use trellis_core::{
    CapSpec, ChartContext, ChartError, DataTable, Frame, HeatMap, Key, PieChart, Renderer,
    ScatterPlot, Selection,
};

struct Txn {
    date: NaiveDate,
    category: String,
    amount: f64,
}

/// Prints one line per frame: `key=value`, with `*`/`-` marking
/// selected/deselected elements.
struct ConsoleRenderer {
    name: &'static str,
}

impl Renderer for ConsoleRenderer {
    fn render(&mut self, frame: &Frame) -> Result<(), ChartError> {
        self.redraw(frame)
    }

    fn redraw(&mut self, frame: &Frame) -> Result<(), ChartError> {
        let parts: Vec<String> = frame
            .items
            .iter()
            .map(|item| {
                let mark = match item.selection {
                    Selection::Selected => "*",
                    Selection::Deselected => "-",
                    Selection::Neutral => "",
                };
                format!("{}{}={:.1}", mark, item.key, item.value)
            })
            .collect();
        println!("  [{}] {}", self.name, parts.join("  "));
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let txns = match std::env::args().nth(1) {
        Some(path) => {
            let txns = load_csv(Path::new(&path))
                .with_context(|| format!("failed to load CSV '{path}'"))?;
            println!("Loaded {} transactions from {path}", txns.len());
            txns
        }
        None => {
            println!("No CSV given; using built-in sample data.");
            sample_txns()
        }
    };
    if txns.is_empty() {
        anyhow::bail!("no transactions loaded; expected date,category,amount rows");
    }
    tracing::info!(rows = txns.len(), "transaction table ready");

    let table = DataTable::new(txns);
    let ctx = ChartContext::new();

    // Pie: spend by category, capped to the top 4 plus "Others".
    let cat_dim = table.dimension(|t: &Txn| Key::from(t.category.clone()));
    let cat_group = cat_dim.group_sum(|t| t.amount);
    let pie = PieChart::new(
        &ctx,
        "spend",
        Rc::new(cat_dim),
        Rc::new(cat_group),
        Box::new(ConsoleRenderer { name: "categories" }),
    );
    pie.borrow_mut().set_cap(CapSpec::new(4));

    // Heatmap: transaction counts by (month, weekday) cell.
    let cell_dim = table.dimension(|t: &Txn| {
        Key::pair(t.date.month() as i64, t.date.weekday().num_days_from_monday() as i64)
    });
    let cell_group = cell_dim.group_count();
    let _heat = HeatMap::new(
        &ctx,
        "spend",
        Rc::new(cell_dim),
        Rc::new(cell_group),
        Box::new(ConsoleRenderer { name: "month x weekday" }),
    );

    // Scatter: (day of month, amount) points.
    let point_dim = table.dimension(|t: &Txn| Key::pair(t.date.day() as f64, t.amount));
    let point_group = point_dim.group_count();
    let scatter = ScatterPlot::new(
        &ctx,
        "spend",
        Rc::new(point_dim),
        Rc::new(point_group),
        Box::new(ConsoleRenderer { name: "day vs amount" }),
    );

    println!("\ninitial render:");
    ctx.render_all()
        .map_err(|e| anyhow::anyhow!("initial render failed: {e}"))?;

    println!("\nclick category 'groceries':");
    pie.borrow_mut().on_click("groceries");
    ctx.pump_until_idle();

    println!("\nbrush day 1..15, amount 0..50 on the scatter:");
    scatter.borrow_mut().on_brush(Some(((1.0, 0.0), (15.0, 50.0))));
    ctx.pump_until_idle();

    println!("\nclear both selections:");
    pie.borrow_mut().on_click("groceries");
    scatter.borrow_mut().on_brush(None);
    ctx.pump_until_idle();

    Ok(())
}

/// Load `date,category,amount` rows; dates are `YYYY-MM-DD`.
fn load_csv(path: &Path) -> Result<Vec<Txn>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect::<Vec<_>>();
    let col = |name: &str| headers.iter().position(|h| h == name);
    let (i_date, i_cat, i_amount) = (
        col("date").context("missing 'date' column")?,
        col("category").context("missing 'category' column")?,
        col("amount").context("missing 'amount' column")?,
    );

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let date_str = rec.get(i_date).unwrap_or_default().trim();
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .with_context(|| format!("bad date '{date_str}'"))?;
        let category = rec.get(i_cat).unwrap_or_default().trim().to_string();
        let amount = rec
            .get(i_amount)
            .unwrap_or_default()
            .trim()
            .parse::<f64>()
            .with_context(|| "bad amount")?;
        out.push(Txn { date, category, amount });
    }
    Ok(out)
}

fn sample_txns() -> Vec<Txn> {
    let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let t = |date, category: &str, amount| Txn { date, category: category.to_string(), amount };
    vec![
        t(d(2026, 1, 3), "groceries", 42.5),
        t(d(2026, 1, 5), "transport", 12.0),
        t(d(2026, 1, 12), "groceries", 31.0),
        t(d(2026, 1, 20), "dining", 58.0),
        t(d(2026, 2, 2), "groceries", 27.5),
        t(d(2026, 2, 9), "rent", 900.0),
        t(d(2026, 2, 14), "dining", 74.0),
        t(d(2026, 2, 23), "transport", 9.5),
        t(d(2026, 3, 1), "groceries", 38.0),
        t(d(2026, 3, 8), "utilities", 120.0),
        t(d(2026, 3, 17), "dining", 22.0),
        t(d(2026, 3, 28), "transport", 14.0),
    ]
}
