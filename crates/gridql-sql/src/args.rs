use gridql_core::bail;
use gridql_core::meta::{Filter, FilterOp, LogicalOp, Sort};
use gridql_core::stmt::{Direction, Value};
use gridql_core::Result;

/// Pagination bounds. Out-of-range requests are clamped, never rejected.
const DEFAULT_LIMIT: u64 = 25;
const MAX_LIMIT: u64 = 1000;

/// Raw request parameters, exactly as they arrive on the wire. Everything
/// is an optional string; [`ListArgs::normalize`] turns them into typed
/// arguments.
#[derive(Debug, Default, Clone)]
pub struct RawParams {
    pub limit: Option<String>,
    pub offset: Option<String>,

    /// Either a JSON array of sort objects or a comma-separated list of
    /// column titles, each optionally prefixed with `-` for descending.
    pub sort: Option<String>,

    /// A JSON array of filter nodes.
    pub filter: Option<String>,

    /// A condition string such as `(Name,eq,Alice)~and(Age,gt,21)`.
    pub where_clause: Option<String>,
}

/// Normalized list arguments, ready for the query compiler.
#[derive(Debug, Default)]
pub struct ListArgs {
    pub limit: u64,
    pub offset: u64,
    pub sorts: Vec<Sort>,
    pub filters: Vec<Filter>,
    pub where_filter: Option<Filter>,
}

impl ListArgs {
    /// Normalizes raw request parameters.
    ///
    /// Unparseable pagination values fall back to their defaults and
    /// malformed filter or sort JSON is ignored, mirroring how callers
    /// expect sloppy query strings to degrade. A malformed condition
    /// string is the one hard error: it expresses intent that cannot be
    /// partially honored.
    pub fn normalize(raw: &RawParams) -> Result<ListArgs> {
        let limit = raw
            .limit
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);

        let offset = raw
            .offset
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0);

        let sorts = raw.sort.as_deref().map(parse_sorts).unwrap_or_default();

        let filters = raw
            .filter
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default();

        let where_filter = match raw.where_clause.as_deref() {
            Some(s) if !s.trim().is_empty() => Some(parse_where(s.trim())?),
            _ => None,
        };

        Ok(ListArgs {
            limit,
            offset,
            sorts,
            filters,
            where_filter,
        })
    }
}

/// Parses the sort parameter: JSON when it looks like JSON, otherwise a
/// comma-separated title list with `-` marking descending order.
fn parse_sorts(src: &str) -> Vec<Sort> {
    let src = src.trim();

    if src.starts_with('[') {
        return serde_json::from_str(src).unwrap_or_default();
    }

    src.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.strip_prefix('-') {
            Some(title) => Sort::new(title, Direction::Desc),
            None => Sort::new(part, Direction::Asc),
        })
        .collect()
}

/// Parses a condition string into a filter tree.
///
/// Grammar: a sequence of parenthesized terms joined by `~and` / `~or`,
/// where a term is either a leaf `(column,op[,value])` or a nested group
/// `((...)~or(...))`. Runs of the same connective collapse into one
/// group; when the connective changes, everything parsed so far becomes
/// the first child of a new group, so `a~and b~or c` reads as
/// `(a AND b) OR c`.
fn parse_where(src: &str) -> Result<Filter> {
    let mut parser = Parser { src, pos: 0 };
    let filter = parser.expr()?;
    if parser.pos != src.len() {
        bail!(
            "malformed condition string: trailing input at byte {}",
            parser.pos
        );
    }
    Ok(filter)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn expr(&mut self) -> Result<Filter> {
        let mut op = LogicalOp::And;
        let mut children = vec![self.term()?];

        while let Some(next_op) = self.connective()? {
            if next_op != op {
                if children.len() > 1 {
                    children = vec![Filter::group(op, children)];
                }
                op = next_op;
            }
            children.push(self.term()?);
        }

        if children.len() == 1 {
            Ok(children.remove(0))
        } else {
            Ok(Filter::group(op, children))
        }
    }

    /// Consumes `~and` / `~or` if present.
    fn connective(&mut self) -> Result<Option<LogicalOp>> {
        if !self.rest().starts_with('~') {
            return Ok(None);
        }
        if self.eat("~and") {
            Ok(Some(LogicalOp::And))
        } else if self.eat("~or") {
            Ok(Some(LogicalOp::Or))
        } else {
            bail!(
                "malformed condition string: expected `~and` or `~or` at byte {}",
                self.pos
            );
        }
    }

    fn term(&mut self) -> Result<Filter> {
        if !self.eat("(") {
            bail!(
                "malformed condition string: expected `(` at byte {}",
                self.pos
            );
        }

        if self.rest().starts_with('(') {
            // Nested group
            let inner = self.expr()?;
            if !self.eat(")") {
                bail!(
                    "malformed condition string: expected `)` at byte {}",
                    self.pos
                );
            }
            return Ok(inner);
        }

        self.leaf()
    }

    fn leaf(&mut self) -> Result<Filter> {
        let column = self.until(&[','])?;
        if !self.eat(",") {
            bail!(
                "malformed condition string: expected `,` after column at byte {}",
                self.pos
            );
        }

        let op_str = self.until(&[',', ')'])?;
        let op = match op_str.trim() {
            "eq" => FilterOp::Eq,
            "neq" => FilterOp::Neq,
            "gt" => FilterOp::Gt,
            "gte" => FilterOp::Gte,
            "lt" => FilterOp::Lt,
            "lte" => FilterOp::Lte,
            "like" => FilterOp::Like,
            "nlike" => FilterOp::Nlike,
            "null" => FilterOp::Null,
            "notnull" => FilterOp::NotNull,
            "in" => FilterOp::In,
            "within" => FilterOp::Within,
            other => bail!("malformed condition string: unknown operator `{other}`"),
        };

        let value = if self.eat(",") {
            let raw = self.until(&[')'])?;
            match op {
                // List-valued operators take comma-separated values
                FilterOp::In | FilterOp::Within => {
                    Value::List(raw.split(',').map(parse_value).collect())
                }
                _ => parse_value(raw),
            }
        } else {
            Value::Null
        };

        if !self.eat(")") {
            bail!(
                "malformed condition string: expected `)` at byte {}",
                self.pos
            );
        }

        Ok(Filter::Leaf(gridql_core::meta::FilterLeaf {
            column: column.trim().to_string(),
            op,
            value,
        }))
    }

    fn until(&mut self, stops: &[char]) -> Result<&'a str> {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|(_, ch)| stops.contains(ch))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        if end == rest.len() {
            bail!(
                "malformed condition string: unterminated term at byte {}",
                self.pos
            );
        }
        let token = &rest[..end];
        self.pos += end;
        Ok(token)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }
}

fn parse_value(raw: &str) -> Value {
    let raw = raw.trim();
    match raw {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(i) = raw.parse::<i64>() {
                Value::I64(i)
            } else if let Ok(f) = raw.parse::<f64>() {
                Value::F64(f)
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}
