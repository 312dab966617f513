//! 看板页面渲染
//!
//! 卡片和表格两种视图使用同一份过滤、排序后的数据，
//! 页面状态（关键字、排序、视图模式）都保存在链接参数中

use anyhow::{anyhow, Result};
use serde::Serialize;
use tera::{Context, Tera};
use url::form_urlencoded;

use super::sort::cycle;
use crate::config::DisplayConfig;
use crate::models::{Column, DashboardView, DatasetInfo, SortKey, StockRow, ViewMode};

const LAYOUT_TEMPLATE: &str = include_str!("../../templates/layout.html");
const CARDS_TEMPLATE: &str = include_str!("../../templates/cards.html");
const TABLE_TEMPLATE: &str = include_str!("../../templates/table.html");

/// 页面链接，保留关键字、排序和视图模式
pub fn page_href(query: &str, sort: Option<SortKey>, mode: ViewMode) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let query = query.trim();
    if !query.is_empty() {
        serializer.append_pair("q", query);
    }
    if let Some(key) = sort {
        serializer.append_pair("sort", key.column.id());
        serializer.append_pair("dir", key.direction.id());
    }
    serializer.append_pair("view", mode.id());
    format!("/?{}", serializer.finish())
}

/// 表头
#[derive(Debug, Serialize)]
struct HeaderCell {
    id: &'static str,
    label: &'static str,
    /// 排序指示符（🔼/🔽），未排序为空
    indicator: &'static str,
    /// 点击后的排序链接
    href: String,
}

#[derive(Debug, Serialize)]
struct Cell {
    text: String,
    color: Option<&'static str>,
    link: Option<String>,
}

#[derive(Debug, Serialize)]
struct TableRow {
    symbol: String,
    cells: Vec<Cell>,
}

#[derive(Debug, Serialize)]
struct Card {
    symbol: String,
    link: Option<String>,
    group_label: String,
    group_color: String,
    price: String,
    drop: String,
    pe_text: String,
    pe_color: &'static str,
    strategy_glyph: &'static str,
}

fn text_or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn card(row: &StockRow) -> Card {
    let record = &row.record;
    let display = &row.display;
    Card {
        symbol: record.symbol.clone().unwrap_or_default(),
        link: display.link.clone(),
        group_label: display.group_label.clone(),
        group_color: display.group_color.clone(),
        price: text_or_dash(record.today.as_deref()),
        drop: text_or_dash(record.drop.as_deref()),
        pe_text: display.pe_text.clone(),
        pe_color: display.pe_color,
        strategy_glyph: display.strategy_glyph,
    }
}

fn cell(row: &StockRow, column: Column) -> Cell {
    let display = &row.display;
    let plain = |text: String| Cell {
        text,
        color: None,
        link: None,
    };

    match column {
        Column::Stock => Cell {
            text: row.record.symbol.clone().unwrap_or_default(),
            color: None,
            link: display.link.clone(),
        },
        Column::Potential => Cell {
            text: row.record.potential.clone().unwrap_or_default(),
            color: Some(display.potential_color),
            link: None,
        },
        Column::PriceEarnings => Cell {
            text: display.pe_text.clone(),
            color: Some(display.pe_color),
            link: None,
        },
        Column::Strategy => plain(display.strategy_glyph.to_string()),
        Column::Author => plain(display.authors.clone()),
        other => plain(
            row.record
                .value(other)
                .map(|v| v.into_owned())
                .unwrap_or_default(),
        ),
    }
}

/// 页面渲染器
pub struct PageRenderer {
    tera: Tera,
    columns: Vec<Column>,
}

impl PageRenderer {
    pub fn new(display: &DisplayConfig) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("layout.html", LAYOUT_TEMPLATE),
            ("cards.html", CARDS_TEMPLATE),
            ("table.html", TABLE_TEMPLATE),
        ])
        .map_err(|e| anyhow!("加载页面模板失败: {}", e))?;

        Ok(Self {
            tera,
            columns: display.visible_columns(),
        })
    }

    fn headers(&self, view: &DashboardView) -> Vec<HeaderCell> {
        let state = &view.state;
        self.columns
            .iter()
            .map(|column| {
                let indicator = match state.sort {
                    Some(key) if key.column == *column => key.direction.glyph(),
                    _ => "",
                };
                HeaderCell {
                    id: column.id(),
                    label: column.header(),
                    indicator,
                    href: page_href(&state.query, cycle(state.sort, *column), state.mode),
                }
            })
            .collect()
    }

    /// 按视图模式渲染完整页面
    pub fn render(&self, view: &DashboardView, info: &DatasetInfo) -> Result<String> {
        let state = &view.state;
        let mut context = Context::new();
        context.insert("query", &state.query);
        context.insert("sort_column", &state.sort.map(|k| k.column.id()));
        context.insert("sort_dir", &state.sort.map(|k| k.direction.id()));
        context.insert("mode", state.mode.id());
        context.insert(
            "toggle_href",
            &page_href(&state.query, state.sort, state.mode.toggled()),
        );
        context.insert(
            "toggle_label",
            match state.mode {
                ViewMode::Cards => "Show as list",
                ViewMode::List => "Show as cards",
            },
        );
        context.insert("matched", &view.matched);
        context.insert("total", &view.total);
        context.insert("source", &info.source);
        context.insert("loaded_at", &info.loaded_at);

        let template = match state.mode {
            ViewMode::Cards => {
                let cards: Vec<Card> = view.rows.iter().map(card).collect();
                context.insert("cards", &cards);
                "cards.html"
            }
            ViewMode::List => {
                let rows: Vec<TableRow> = view
                    .rows
                    .iter()
                    .map(|row| TableRow {
                        symbol: row.record.symbol.clone().unwrap_or_default(),
                        cells: self.columns.iter().map(|c| cell(row, *c)).collect(),
                    })
                    .collect();
                context.insert("headers", &self.headers(view));
                context.insert("table_rows", &rows);
                "table.html"
            }
        };

        self.tera
            .render(template, &context)
            .map_err(|e| anyhow!("渲染页面 {} 失败: {:?}", template, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use crate::models::{DashboardState, StockRecord};
    use crate::services::dashboard::{compute_view, search_fields};
    use scraper::{Html, Selector};

    fn records() -> Vec<StockRecord> {
        let make = |symbol: &str, pe: &str, trend: &str, group: &str, strategy: &str| StockRecord {
            symbol: Some(symbol.to_string()),
            url: Some(format!("https://finance.yahoo.com/quote/{}", symbol)),
            today: Some("100".to_string()),
            drop: Some("-10%".to_string()),
            potential: Some("45%".to_string()),
            pe: Some(pe.to_string()),
            trend: Some(trend.to_string()),
            group: Some(group.to_string()),
            strategy: Some(strategy.to_string()),
            authors: vec!["fs".to_string()],
            ..Default::default()
        };
        vec![
            make("TSLA", "12", "Bull", "TECH", "Optimistic"),
            make("AMD", "35", "Bear", "TECH", "Pessimistic"),
            make("KO", "N/A", "Bull", "GOODS", "Optimistic"),
        ]
    }

    fn info() -> DatasetInfo {
        DatasetInfo {
            source: "data/stonks.csv".to_string(),
            records: 3,
            loaded_at: "2026-10-19T10:00:00+00:00".to_string(),
        }
    }

    fn render(state: DashboardState) -> Html {
        let display = DisplayConfig::default();
        let fields = search_fields(&FilterConfig::default(), &display);
        let view = compute_view(&records(), &display, &fields, state);
        let html = PageRenderer::new(&display)
            .unwrap()
            .render(&view, &info())
            .unwrap();
        Html::parse_document(&html)
    }

    fn select<'a>(document: &'a Html, selector: &str) -> Vec<scraper::ElementRef<'a>> {
        let selector = Selector::parse(selector).unwrap();
        document.select(&selector).collect()
    }

    #[test]
    fn test_page_href() {
        assert_eq!(page_href("", None, ViewMode::List), "/?view=list");
        assert_eq!(
            page_href(" bull market ", Some(SortKey::descending(Column::PriceEarnings)), ViewMode::Cards),
            "/?q=bull+market&sort=pe&dir=desc&view=cards"
        );
    }

    #[test]
    fn test_card_view() {
        let document = render(DashboardState {
            query: "bull".to_string(),
            mode: ViewMode::Cards,
            ..Default::default()
        });

        let cards = select(&document, "article.card");
        let symbols: Vec<_> = cards.iter().filter_map(|c| c.value().attr("data-symbol")).collect();
        assert_eq!(symbols, vec!["TSLA", "KO"]);

        let pe = select(&document, "article.card span.pe");
        assert_eq!(pe[0].value().attr("style"), Some("color: green"));
        assert_eq!(pe[1].text().collect::<String>(), "N/A");
        assert_eq!(pe[1].value().attr("style"), Some("color: grey"));

        let link = select(&document, "article.card h3 a");
        assert_eq!(link[0].value().attr("href"), Some("https://finance.yahoo.com/quote/TSLA"));

        let tags = select(&document, ".group-tag");
        assert_eq!(tags[0].text().collect::<String>(), "TECH");
        assert!(select(&document, "table").is_empty());
    }

    #[test]
    fn test_table_view_headers_and_hidden_columns() {
        let document = render(DashboardState {
            sort: Some(SortKey::ascending(Column::PriceEarnings)),
            mode: ViewMode::List,
            ..Default::default()
        });

        let headers = select(&document, "thead th");
        let ids: Vec<_> = headers.iter().filter_map(|h| h.value().attr("data-column")).collect();
        assert_eq!(
            ids,
            vec!["stock", "today", "drop", "buy", "take_profit", "potential", "pe", "strategy", "author"]
        );

        let indicators: Vec<String> = select(&document, "th .sort-indicator")
            .iter()
            .map(|s| s.text().collect())
            .collect();
        assert_eq!(indicators[6], " 🔼");
        assert!(indicators.iter().enumerate().all(|(i, s)| i == 6 || s.is_empty()));

        // 再次点击同一列切换为降序
        let pe_link = select(&document, "th[data-column=pe] a");
        assert_eq!(pe_link[0].value().attr("href"), Some("/?sort=pe&dir=desc&view=list"));
        let stock_link = select(&document, "th[data-column=stock] a");
        assert_eq!(stock_link[0].value().attr("href"), Some("/?sort=stock&dir=asc&view=list"));

        let rows: Vec<_> = select(&document, "tbody tr")
            .iter()
            .filter_map(|r| r.value().attr("data-symbol"))
            .collect();
        assert_eq!(rows, vec!["TSLA", "AMD", "KO"]);
    }

    #[test]
    fn test_toggle_link_preserves_state() {
        let document = render(DashboardState {
            query: "tech".to_string(),
            sort: Some(SortKey::descending(Column::Stock)),
            mode: ViewMode::List,
            ..Default::default()
        });

        let toggle = select(&document, "a.toggle");
        assert_eq!(
            toggle[0].value().attr("href"),
            Some("/?q=tech&sort=stock&dir=desc&view=cards")
        );

        let input = select(&document, "input#filter-by");
        assert_eq!(input[0].value().attr("value"), Some("tech"));
    }

    #[test]
    fn test_values_are_escaped() {
        let display = DisplayConfig::default();
        let records = vec![StockRecord {
            symbol: Some("<script>alert(1)</script>".to_string()),
            ..Default::default()
        }];
        let view = compute_view(&records, &display, &[Column::Stock], DashboardState::default());
        let html = PageRenderer::new(&display).unwrap().render(&view, &info()).unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
