// File: crates/trellis-examples/src/bin/linked_pies.rs
// Summary: Minimal example wiring two pie charts to one table; a click on one
// narrows the other after the coalescing delay.

use std::rc::Rc;

use trellis_core::{ChartContext, ChartError, DataTable, Frame, Key, PieChart, Renderer, Selection};

struct Visit {
    browser: &'static str,
    country: &'static str,
}

/// Prints each frame as a one-line summary.
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
                format!("{}{}={}", mark, item.key, item.value)
            })
            .collect();
        println!("[{}] {}", self.name, parts.join("  "));
        Ok(())
    }
}

fn main() {
    let table = DataTable::new(vec![
        Visit { browser: "firefox", country: "DE" },
        Visit { browser: "firefox", country: "FR" },
        Visit { browser: "chrome", country: "DE" },
        Visit { browser: "chrome", country: "DE" },
        Visit { browser: "safari", country: "FR" },
    ]);

    let ctx = ChartContext::new();

    let browser_dim = table.dimension(|v: &Visit| Key::from(v.browser));
    let browser_group = browser_dim.group_count();
    let country_dim = table.dimension(|v: &Visit| Key::from(v.country));
    let country_group = country_dim.group_count();

    let browsers = PieChart::new(
        &ctx,
        "demo",
        Rc::new(browser_dim),
        Rc::new(browser_group),
        Box::new(ConsoleRenderer { name: "browsers" }),
    );
    let _countries = PieChart::new(
        &ctx,
        "demo",
        Rc::new(country_dim),
        Rc::new(country_group),
        Box::new(ConsoleRenderer { name: "countries" }),
    );

    println!("initial render:");
    ctx.render_group("demo").expect("render");

    println!("\nclick 'firefox':");
    browsers.borrow_mut().on_click("firefox");
    ctx.pump_until_idle();

    println!("\nclick 'firefox' again (deselect):");
    browsers.borrow_mut().on_click("firefox");
    ctx.pump_until_idle();
}
