//! Versioned prompt templates for the two completion calls
//!
//! The worked examples are data, not incidental text: they anchor the
//! query dialect, capitalization, quoting style, and answer phrasing the
//! model is expected to imitate. Changing them changes the output
//! distribution, so they live here next to the templates rather than
//! inline in the pipeline code.

use askama::Template;

/// One question/query/result/response quadruple.
pub struct WorkedExample {
    pub question: &'static str,
    pub query: &'static str,
    pub result: &'static str,
    pub response: &'static str,
}

/// Examples embedded in the question→query prompt.
pub const QUERY_EXAMPLES: &[WorkedExample] = &[
    WorkedExample {
        question: "How many transactions are there for PartNo '0124110001'?",
        query: "SELECT COUNT(*) FROM inventory_transactions WHERE PartNo = '0124110001';",
        result: "[(3,)]",
        response: "There are 3 transactions for PartNo '0124110001'.",
    },
    WorkedExample {
        question: "What is the total incoming quantity for PartNo '0124110008'?",
        query: "SELECT SUM(InQty) FROM inventory_transactions WHERE PartNo = '0124110008';",
        result: "[(0.0,)]",
        response: "The total incoming quantity for PartNo '0124110008' is 0.0.",
    },
];

/// Examples embedded in the result→prose prompt.
pub const RESPONSE_EXAMPLES: &[WorkedExample] = &[
    WorkedExample {
        question: "What is the total incoming quantity for PartNo '0124110008'?",
        query: "SELECT SUM(InQty) FROM inventory_transactions WHERE PartNo = '0124110008';",
        result: "[(10.5,)]",
        response: "The total incoming quantity for PartNo '0124110008' is 10.5.",
    },
    WorkedExample {
        question: "What is the balance of PartNo '0124110001' on 29-04-2024?",
        query: "SELECT Balance FROM inventory_transactions WHERE PartNo = '0124110001' AND TransactionDate = '2024-04-29';",
        result: "[(0.0,)]",
        response: "The balance for PartNo '0124110001' on 29-04-2024 is 0.0.",
    },
    WorkedExample {
        question: "How many transactions have a balance less than 0 for PartNo '0124110008'?",
        query: "SELECT COUNT(*) FROM inventory_transactions WHERE PartNo = '0124110008' AND Balance < 0;",
        result: "[(3,)]",
        response: "There are 3 transactions with a balance less than 0 for PartNo '0124110008'.",
    },
];

/// Prompt asking the model to turn a question into a query.
#[derive(Template)]
#[template(path = "query_prompt.txt")]
pub struct QueryPrompt<'a> {
    pub schema: &'a str,
    pub question: &'a str,
    pub examples: &'a [WorkedExample],
}

impl<'a> QueryPrompt<'a> {
    pub fn new(schema: &'a str, question: &'a str) -> Self {
        QueryPrompt {
            schema,
            question,
            examples: QUERY_EXAMPLES,
        }
    }
}

/// Prompt asking the model to turn a query result into prose.
#[derive(Template)]
#[template(path = "response_prompt.txt")]
pub struct ResponsePrompt<'a> {
    pub schema: &'a str,
    pub question: &'a str,
    pub query: &'a str,
    pub result: &'a str,
    pub examples: &'a [WorkedExample],
}

impl<'a> ResponsePrompt<'a> {
    pub fn new(schema: &'a str, question: &'a str, query: &'a str, result: &'a str) -> Self {
        ResponsePrompt {
            schema,
            question,
            query,
            result,
            examples: RESPONSE_EXAMPLES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_prompt_substitutes_all_slots() {
        let prompt = QueryPrompt::new("Table: inventory_transactions", "How many rows?")
            .render()
            .unwrap();
        assert!(prompt.contains("Table: inventory_transactions"));
        assert!(prompt.contains("question: How many rows?"));
        assert!(prompt.trim_end().ends_with("SQL query:"));
    }

    #[test]
    fn test_query_prompt_embeds_worked_examples() {
        let prompt = QueryPrompt::new("schema", "q").render().unwrap();
        for example in QUERY_EXAMPLES {
            assert!(prompt.contains(example.question));
            assert!(prompt.contains(example.query));
            assert!(prompt.contains(example.result));
            assert!(prompt.contains(example.response));
        }
    }

    #[test]
    fn test_response_prompt_substitutes_all_slots() {
        let prompt = ResponsePrompt::new(
            "Table: inventory_transactions",
            "How many rows?",
            "SELECT COUNT(*) FROM inventory_transactions;",
            "[(3,)]",
        )
        .render()
        .unwrap();
        assert!(prompt.contains("question: How many rows?"));
        assert!(prompt.contains("SQL query: SELECT COUNT(*) FROM inventory_transactions;"));
        assert!(prompt.contains("Result: [(3,)]"));
        assert!(prompt.trim_end().ends_with("Response:"));
    }

    #[test]
    fn test_response_prompt_carries_error_text_verbatim() {
        let prompt = ResponsePrompt::new(
            "schema",
            "q",
            "SELEC oops",
            "Error executing query: You have an error in your SQL syntax",
        )
        .render()
        .unwrap();
        assert!(prompt.contains("Result: Error executing query: You have an error in your SQL syntax"));
    }
}
