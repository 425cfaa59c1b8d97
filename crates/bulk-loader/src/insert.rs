//! Batched INSERT statements for the `users` table.

use mysql_async::Value;
use user_core::{UserRecord, INSERT_COLUMNS, USERS_TABLE};

/// Default batch flush threshold.
pub const DEFAULT_FLUSH_SIZE: usize = 1000;

/// MySQL caps prepared statements at 65,535 placeholders.
const MAX_PLACEHOLDERS: usize = u16::MAX as usize;

/// Largest number of user rows one multi-row INSERT can carry.
pub fn max_rows_per_statement() -> usize {
    MAX_PLACEHOLDERS / INSERT_COLUMNS.len()
}

/// Build a multi-row INSERT for `row_count` users.
pub fn build_insert_sql(row_count: usize) -> String {
    let col_placeholders: Vec<&str> = INSERT_COLUMNS.iter().map(|_| "?").collect();
    let row_template = format!("({})", col_placeholders.join(", "));
    let rows_template: Vec<&str> = (0..row_count).map(|_| row_template.as_str()).collect();

    format!(
        "INSERT INTO `{}` ({}) VALUES {}",
        USERS_TABLE,
        INSERT_COLUMNS
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", "),
        rows_template.join(", ")
    )
}

/// Flatten a batch into positional parameters, row by row.
pub fn batch_params(rows: &[UserRecord]) -> Vec<Value> {
    let mut params = Vec::with_capacity(rows.len() * INSERT_COLUMNS.len());
    for row in rows {
        for value in row.values() {
            params.push(Value::from(value));
        }
    }
    params
}

/// Generate the CREATE TABLE statement for `users`.
pub fn generate_create_table() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS `{USERS_TABLE}` (\
         `id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT, \
         `first_name` VARCHAR(255) NOT NULL, \
         `last_name` VARCHAR(255) NOT NULL, \
         `email` VARCHAR(255) NOT NULL, \
         `address` VARCHAR(512) NOT NULL, \
         PRIMARY KEY (`id`))"
    )
}

/// Generate DROP TABLE statement.
pub fn generate_drop_table() -> String {
    format!("DROP TABLE IF EXISTS `{USERS_TABLE}`")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_insert_sql_single_row() {
        assert_eq!(
            build_insert_sql(1),
            "INSERT INTO `users` (`first_name`, `last_name`, `email`, `address`) VALUES (?, ?, ?, ?)"
        );
    }

    #[test]
    fn test_build_insert_sql_multi_row() {
        let sql = build_insert_sql(3);
        assert!(sql.ends_with("VALUES (?, ?, ?, ?), (?, ?, ?, ?), (?, ?, ?, ?)"));
        assert_eq!(sql.matches('?').count(), 12);
    }

    #[test]
    fn test_batch_params_order() {
        let rows = vec![
            UserRecord::new("a", "b", "c", "d"),
            UserRecord::new("e", "f", "g", "h"),
        ];
        let params = batch_params(&rows);

        assert_eq!(params.len(), 8);
        assert_eq!(params[0], Value::from("a"));
        assert_eq!(params[3], Value::from("d"));
        assert_eq!(params[4], Value::from("e"));
    }

    #[test]
    fn test_max_rows_per_statement() {
        assert_eq!(max_rows_per_statement(), 16_383);
        assert!(DEFAULT_FLUSH_SIZE <= max_rows_per_statement());
    }

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table();

        assert!(sql.contains("CREATE TABLE IF NOT EXISTS `users`"));
        assert!(sql.contains("`id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT"));
        assert!(sql.contains("`email` VARCHAR(255) NOT NULL"));
        assert!(sql.contains("PRIMARY KEY (`id`)"));
    }

    #[test]
    fn test_generate_drop_table() {
        assert_eq!(generate_drop_table(), "DROP TABLE IF EXISTS `users`");
    }
}
