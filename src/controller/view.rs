//! 页面视图
//!
//! 以节点树声明页面结构，渲染为 HTML。元素 id 与交互规则的更新区域一一对应。

use chrono::NaiveDate;

/// 日期选择器允许的最早日期
pub const MIN_DATE: (i32, u32, u32) = (1995, 8, 5);

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";
const FONT_CSS: &str = "https://fonts.googleapis.com/css2?family=Roboto&display=swap";
const DASHBOARD_JS: &str = include_str!("../../assets/dashboard.js");

/// 视图节点
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element {
        tag: &'static str,
        attrs: Vec<(&'static str, String)>,
        children: Vec<Node>,
    },
    Text(String),
}

/// 无闭合标签的元素
const VOID_TAGS: [&str; 4] = ["img", "input", "meta", "link"];

impl Node {
    pub fn el(tag: &'static str) -> Self {
        Node::Element { tag, attrs: Vec::new(), children: Vec::new() }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        if let Node::Element { attrs, .. } = &mut self {
            attrs.push((name, value.into()));
        }
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, node: Node) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        if let Node::Element { children, .. } = &mut self {
            children.extend(nodes);
        }
        self
    }

    /// 按 id 查找节点
    pub fn find(&self, id: &str) -> Option<&Node> {
        match self {
            Node::Text(_) => None,
            Node::Element { attrs, children, .. } => {
                if attrs.iter().any(|(k, v)| *k == "id" && v == id) {
                    return Some(self);
                }
                children.iter().find_map(|c| c.find(id))
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Node::Text(s) => out.push_str(&escape(s)),
            Node::Element { tag, attrs, children } => {
                out.push('<');
                out.push_str(tag);
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&escape(v));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(tag) {
                    return;
                }
                for c in children {
                    c.render_into(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

/// HTML 转义
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn p(text: &str) -> Node {
    Node::el("p").child(Node::text(text))
}

fn button(id: &str, label: &str, class: Option<&str>) -> Node {
    let node = Node::el("button").id(id).attr("type", "button").child(Node::text(label));
    match class {
        Some(c) => node.class(c),
        None => node,
    }
}

fn text_input(id: &str, placeholder: Option<&str>) -> Node {
    let node = Node::el("input").id(id).attr("type", "text");
    match placeholder {
        Some(ph) => node.attr("placeholder", ph),
        None => node,
    }
}

fn date_input(id: &str, min: NaiveDate, max: NaiveDate, value: Option<NaiveDate>) -> Node {
    let node = Node::el("input")
        .id(id)
        .attr("type", "date")
        .attr("min", min.to_string())
        .attr("max", max.to_string());
    match value {
        Some(v) => node.attr("value", v.to_string()),
        None => node,
    }
}

/// 页面主体
pub fn layout(today: NaiveDate) -> Node {
    let (y, m, d) = MIN_DATE;
    let min_date = NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);

    let nav = Node::el("div").class("nav").children([
        p("Stock Dash App").class("start"),
        Node::el("div").class("input-place").children([
            p("Stock Code: "),
            Node::el("div").class("form").children([
                text_input("dropdown_tickers", None),
                button("submit", "Search", None),
            ]),
        ]),
        Node::el("div").class("date").child(
            Node::el("div").id("my-date-picker-range").children([
                date_input("start_date", min_date, today, None),
                date_input("end_date", min_date, today, Some(today)),
            ]),
        ),
        Node::el("div").class("buttons").children([
            button("stock", "Stock Price", Some("stock-btn")),
            button("indicators", "Indicators", Some("indicators-btn bg-white")),
            text_input("n_days", Some("Number of days")),
            button("forecast", "Forecast", Some("forecast-btn")),
        ]),
    ]);

    let content = Node::el("div").class("content").children([
        Node::el("div").class("header").children([
            Node::el("img").id("logo"),
            Node::el("p").id("ticker"),
        ]),
        Node::el("div").id("description").class("decription_ticker"),
        Node::el("div").id("graphs-content"),
        Node::el("div").id("main-content"),
        Node::el("div").id("forecast-content"),
    ]);

    Node::el("div").class("container").children([nav, content])
}

/// 完整页面
pub fn page(today: NaiveDate) -> String {
    let head = Node::el("head").children([
        Node::el("meta").attr("charset", "utf-8"),
        Node::el("title").child(Node::text("Stock Dash App")),
        Node::el("link").attr("rel", "stylesheet").attr("href", FONT_CSS),
        Node::el("script").attr("src", PLOTLY_CDN),
    ]);

    format!(
        "<!DOCTYPE html><html>{}<body>{}<script>{}</script></body></html>",
        head.render(),
        layout(today).render(),
        DASHBOARD_JS
    )
}
