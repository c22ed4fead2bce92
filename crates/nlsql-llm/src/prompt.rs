//! Prompt construction for SQL generation.
//!
//! The disambiguation rules are the load-bearing part: when two tables
//! share a column name (`product_id` in both `orders` and `products`),
//! unqualified references are the dominant cause of execution failures,
//! so the prompt demands table-qualified columns and aliased joins.

/// Compose the full instruction prompt from the user question and the
/// rendered schema description. Both appear verbatim in the output.
pub fn build_prompt(question: &str, metadata_text: &str) -> String {
    format!(
        r#"You are a SQL expert. Given the following database schema and user question, generate a SQL query.

Database Schema:
{metadata_text}

User Question: {question}

Generate a SQL query that answers the user's question. Return ONLY the raw SQL query without any explanation, markdown formatting, or code blocks.
The query should be compatible with DuckDB SQL dialect.
DO NOT include any markdown formatting like ```sql or ```.

Rules for referencing columns:
1. Qualify EVERY column reference with its table name or alias. The same column name can exist in more than one table, and an unqualified reference is ambiguous.
2. Give EVERY joined table an alias and use that alias consistently.

Incorrect (ambiguous column references):
SELECT product_id, COUNT(*) FROM orders JOIN products ON product_id = product_id GROUP BY product_id

Correct (every column qualified, every table aliased):
SELECT p.product_id, COUNT(*) FROM orders o JOIN products p ON o.product_id = p.product_id GROUP BY p.product_id
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_question_and_metadata_verbatim() {
        let metadata = "Table: orders\nDescription: Customer orders\nColumns:\n- order_id: id";
        let question = "How many orders per product?";
        let prompt = build_prompt(question, metadata);

        assert!(prompt.contains(metadata));
        assert!(prompt.contains(question));
    }

    #[test]
    fn prompt_states_role_and_output_contract() {
        let prompt = build_prompt("q", "m");
        assert!(prompt.contains("You are a SQL expert"));
        assert!(prompt.contains("ONLY the raw SQL query"));
        assert!(prompt.contains("DuckDB SQL dialect"));
    }

    #[test]
    fn brace_placeholders_in_metadata_stay_literal() {
        let metadata = "Table: notes\n- body: Free text, may contain {question} markers";
        let prompt = build_prompt("what now?", metadata);

        assert!(prompt.contains("{question} markers"));
        assert!(prompt.contains("User Question: what now?"));
    }

    #[test]
    fn prompt_embeds_disambiguation_examples() {
        let prompt = build_prompt("q", "m");
        assert!(prompt.contains("Incorrect"));
        assert!(prompt.contains("Correct"));
        assert!(prompt.contains("o.product_id = p.product_id"));
    }
}
