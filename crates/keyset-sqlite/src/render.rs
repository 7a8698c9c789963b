//! SQL rendering for compiled pagination plans.
//!
//! The caller's base query is wrapped as a derived table so the boundary
//! predicate never interacts with the caller's own `WHERE`, `GROUP BY` or
//! compound selects:
//!
//! ```text
//! SELECT * FROM (<base query>
//! ) AS keyset_page WHERE <predicate> ORDER BY <keys> LIMIT <n>
//! ```
//!
//! Keyset columns therefore refer to result-set column names of the base
//! query. Cursor values are bound as `$N` placeholders numbered after the
//! caller's own parameters.

use keyset_core::{NullsOrder, OrderSpec, Plan, Predicate, SortDirection};
use serde_json::Value as JsonValue;

use crate::Error;

/// Alias given to the wrapped base query.
const SOURCE_ALIAS: &str = "keyset_page";

/// Validate that a column name is safe for SQL interpolation.
///
/// Accepts names matching `[a-zA-Z_][a-zA-Z0-9_]*`. Qualified names are
/// rejected since only the wrapped result set is in scope.
pub(crate) fn validate_column_name(name: &str) -> Result<(), Error> {
   let invalid = || Error::InvalidColumnName {
      name: name.to_string(),
   };

   let mut chars = name.chars();
   let Some(first) = chars.next() else {
      return Err(invalid());
   };
   if !first.is_ascii_alphabetic() && first != '_' {
      return Err(invalid());
   }
   if chars.any(|ch| !ch.is_ascii_alphanumeric() && ch != '_') {
      return Err(invalid());
   }

   Ok(())
}

/// Quote an identifier with double quotes, doubling embedded quotes.
pub(crate) fn quote_identifier(name: &str) -> String {
   format!("\"{}\"", name.replace('"', "\"\""))
}

/// Index just past the closing `quote` of a quoted section starting at
/// `start`. Doubled quotes are escapes. Unterminated sections run to the end.
fn skip_quoted(bytes: &[u8], start: usize, quote: u8) -> usize {
   let mut i = start + 1;
   while i < bytes.len() {
      if bytes[i] == quote {
         if bytes.get(i + 1) == Some(&quote) {
            i += 2;
            continue;
         }
         return i + 1;
      }
      i += 1;
   }
   bytes.len()
}

/// Index just past the first `terminator` at or after `from`, or the end.
fn skip_past(bytes: &[u8], from: usize, terminator: &[u8]) -> usize {
   let from = from.min(bytes.len());
   bytes[from..]
      .windows(terminator.len())
      .position(|window| window == terminator)
      .map_or(bytes.len(), |pos| from + pos + terminator.len())
}

/// Uppercased words found at parenthesis depth 0, outside string literals,
/// quoted identifiers (`"x"`, `` `x` ``, `[x]`) and comments.
fn top_level_words(query: &str) -> Vec<String> {
   let bytes = query.as_bytes();
   let mut words = Vec::new();
   let mut depth: i32 = 0;
   let mut i = 0;

   while i < bytes.len() {
      match bytes[i] {
         b'(' => {
            depth += 1;
            i += 1;
         }
         b')' => {
            depth -= 1;
            i += 1;
         }
         quote @ (b'\'' | b'"' | b'`') => i = skip_quoted(bytes, i, quote),
         b'[' => i = skip_past(bytes, i + 1, b"]"),
         b'-' if bytes.get(i + 1) == Some(&b'-') => i = skip_past(bytes, i + 2, b"\n"),
         b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_past(bytes, i + 2, b"*/"),
         b if b.is_ascii_alphanumeric() || b == b'_' => {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
               i += 1;
            }
            if depth == 0 {
               words.push(query[start..i].to_ascii_uppercase());
            }
         }
         _ => i += 1,
      }
   }

   words
}

/// Reject base queries with a top-level ORDER BY or LIMIT.
///
/// The rendered query supplies its own ordering and limit. Clauses inside
/// subqueries, comments and string literals are allowed.
pub(crate) fn validate_base_query(query: &str) -> Result<(), Error> {
   let words = top_level_words(query);
   let has_limit = words.iter().any(|w| w == "LIMIT");
   let has_order_by = words.windows(2).any(|pair| pair[0] == "ORDER" && pair[1] == "BY");

   if has_limit || has_order_by {
      return Err(Error::InvalidPaginationQuery);
   }

   Ok(())
}

/// Accumulates cursor bind values and hands out their placeholders.
struct Binds {
   next_param: usize,
   values: Vec<JsonValue>,
}

impl Binds {
   fn push(&mut self, value: &JsonValue) -> String {
      let placeholder = format!("${}", self.next_param);
      self.next_param += 1;
      self.values.push(value.clone());
      placeholder
   }
}

fn collect_conjuncts<'a>(predicate: &'a Predicate, out: &mut Vec<&'a Predicate>) {
   match predicate {
      Predicate::And(left, right) => {
         collect_conjuncts(left, out);
         collect_conjuncts(right, out);
      }
      other => out.push(other),
   }
}

fn collect_disjuncts<'a>(predicate: &'a Predicate, out: &mut Vec<&'a Predicate>) {
   match predicate {
      Predicate::Or(left, right) => {
         collect_disjuncts(left, out);
         collect_disjuncts(right, out);
      }
      other => out.push(other),
   }
}

/// Render a boundary predicate, appending its operands to `binds` in
/// placeholder order.
///
/// Nested AND/OR chains are flattened, so the expanded mixed-direction form
/// reads `("a" > $1) OR ("a" = $2 AND "b" < $3) OR (...)`.
fn render_predicate(predicate: &Predicate, binds: &mut Binds) -> Result<String, Error> {
   match predicate {
      Predicate::Comparison {
         field,
         operator,
         operand,
      } => {
         validate_column_name(field)?;
         Ok(format!(
            "{} {} {}",
            quote_identifier(field),
            operator.symbol(),
            binds.push(operand)
         ))
      }
      Predicate::Tuple {
         fields,
         operator,
         operands,
      } => {
         let mut columns = Vec::with_capacity(fields.len());
         for field in fields {
            validate_column_name(field)?;
            columns.push(quote_identifier(field));
         }
         let placeholders: Vec<String> = operands.iter().map(|v| binds.push(v)).collect();

         Ok(format!(
            "({}) {} ({})",
            columns.join(", "),
            operator.symbol(),
            placeholders.join(", ")
         ))
      }
      Predicate::IsNull { field } => {
         validate_column_name(field)?;
         Ok(format!("{} IS NULL", quote_identifier(field)))
      }
      Predicate::IsNotNull { field } => {
         validate_column_name(field)?;
         Ok(format!("{} IS NOT NULL", quote_identifier(field)))
      }
      Predicate::Never => Ok("1 = 0".to_string()),
      Predicate::And(..) => {
         let mut conjuncts = Vec::new();
         collect_conjuncts(predicate, &mut conjuncts);

         let mut parts = Vec::with_capacity(conjuncts.len());
         for conjunct in conjuncts {
            let sql = render_predicate(conjunct, binds)?;
            // AND binds tighter than OR
            if matches!(conjunct, Predicate::Or(..)) {
               parts.push(format!("({})", sql));
            } else {
               parts.push(sql);
            }
         }
         Ok(parts.join(" AND "))
      }
      Predicate::Or(..) => {
         let mut disjuncts = Vec::new();
         collect_disjuncts(predicate, &mut disjuncts);

         let mut parts = Vec::with_capacity(disjuncts.len());
         for disjunct in disjuncts {
            parts.push(format!("({})", render_predicate(disjunct, binds)?));
         }
         Ok(parts.join(" OR "))
      }
   }
}

/// Build the ORDER BY clause, including explicit NULL placement.
pub(crate) fn build_order_by(order: &OrderSpec) -> String {
   let parts: Vec<String> = order
      .iter()
      .map(|column| {
         let direction = match column.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
         };
         let nulls = match column.nulls {
            NullsOrder::First => " NULLS FIRST",
            NullsOrder::Last => " NULLS LAST",
            NullsOrder::Unspecified => "",
         };
         format!("{} {}{}", quote_identifier(&column.name), direction, nulls)
      })
      .collect();

   format!("ORDER BY {}", parts.join(", "))
}

/// Render a plan against a base query.
///
/// `user_param_count` is the number of bind values the caller supplies for
/// the base query; cursor placeholders start at `user_param_count + 1`.
///
/// Returns the final SQL and the cursor bind values, which must be bound
/// after the caller's own values.
pub(crate) fn render_plan(
   base_query: &str,
   plan: &Plan,
   user_param_count: usize,
) -> Result<(String, Vec<JsonValue>), Error> {
   validate_base_query(base_query)?;

   for column in plan.order().iter() {
      validate_column_name(&column.name)?;
   }

   let base = base_query.trim_end().trim_end_matches(';');
   // The newline keeps a trailing line comment from swallowing the paren
   let mut sql = format!("SELECT * FROM ({}\n) AS {}", base, SOURCE_ALIAS);
   let mut binds = Binds {
      next_param: user_param_count + 1,
      values: Vec::new(),
   };

   if let Some(predicate) = plan.predicate() {
      let condition = render_predicate(predicate, &mut binds)?;
      sql = format!("{} WHERE {}", sql, condition);
   }

   sql = format!("{} {}", sql, build_order_by(plan.order()));

   if plan.limit() > 0 {
      sql = format!("{} LIMIT {}", sql, plan.limit());
   }

   Ok((sql, binds.values))
}
