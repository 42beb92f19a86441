use crate::schema::SchemaDescriptor;

pub const GENERATE_SYSTEM: &str =
    "You convert natural language requests into single SQL statements for a SQLite database.";

pub const REPAIR_SYSTEM: &str = "You fix invalid SQL statements for a SQLite database.";

pub fn generation_prompt(request: &str, schema: &SchemaDescriptor) -> String {
    format!(
        "{}\n\nUser request: {}\n\nSQL statement:\n",
        schema.as_str(),
        request
    )
}

pub fn repair_prompt(
    request: &str,
    failed_sql: &str,
    error_message: &str,
    schema: &SchemaDescriptor,
) -> String {
    format!(
        "\
You previously generated this SQL for a user request:

User request:
{request}

Original SQL:
{failed_sql}

When executing this SQL on SQLite, the following error occurred:
{error_message}

Database schema:
{schema}

Your task:
- Return a corrected SQL statement that is valid for this schema and SQLite.
- Keep the query as close as possible to the user's intent.
- You may use SELECT, INSERT, UPDATE, DELETE, CREATE TABLE or ALTER TABLE.
- Do NOT modify or delete data unless the user clearly requested it.
- Do NOT include explanations or comments.
- Do NOT wrap the SQL in markdown or ``` fences.
- Output ONLY the fixed SQL statement.
",
        schema = schema.as_str()
    )
}
