use rusqlite::Connection;
use sql_rows::prelude::*;

pub const INITIAL_ROWS: [(&str, i64, &str); 3] = [("A", 1, "101"), ("B", 2, "202"), ("C", 3, "303")];

/// In-memory database with table `test (a, b, c)` holding `INITIAL_ROWS`.
pub fn seeded_connection() -> Result<Connection, SqlRowsError> {
    let conn = Connection::open_in_memory()?;
    seed(&conn)?;
    Ok(conn)
}

pub fn seed(conn: &Connection) -> Result<(), SqlRowsError> {
    let runner = QueryRunner::new(conn);
    runner.execute("CREATE TABLE test (a, b, c)", Params::None)?;
    runner.execute(
        "INSERT INTO test VALUES (?, ?, ?)",
        INITIAL_ROWS
            .iter()
            .map(|&(a, b, c)| ParamSet::positional([SqlValue::from(a), SqlValue::from(b), SqlValue::from(c)]))
            .collect::<Vec<_>>(),
    )
}

#[allow(dead_code)]
pub fn initial_tuple(i: usize) -> Row {
    let (a, b, c) = INITIAL_ROWS[i];
    Row::Tuple(vec![SqlValue::from(a), SqlValue::from(b), SqlValue::from(c)])
}

#[allow(dead_code)]
pub fn scalars(values: &[i64]) -> Vec<Row> {
    values.iter().map(|v| Row::Scalar(SqlValue::Int(*v))).collect()
}
