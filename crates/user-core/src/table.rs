//! Shape of the `users` table and of the exported CSV file.

/// Name of the table both tools operate on.
pub const USERS_TABLE: &str = "users";

/// Columns written by the loader. `id` is assigned by the database.
pub const INSERT_COLUMNS: [&str; 4] = ["first_name", "last_name", "email", "address"];

/// Columns read by the exporter, in CSV order.
pub const SELECT_COLUMNS: [&str; 5] = ["id", "first_name", "last_name", "email", "address"];

/// Header row of the exported CSV file.
pub const CSV_HEADER: [&str; 5] = ["ID", "First Name", "Last Name", "Email", "Address"];

/// Connection string used when none is configured.
pub const DEFAULT_MYSQL_URL: &str = "mysql://root@localhost:3306/users_db";
