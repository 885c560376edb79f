//! GraphQL documents for the five todo operations.

/// A named GraphQL operation and the `data` field its payload arrives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub field: &'static str,
    pub document: &'static str,
}

pub const LIST_TODOS: Operation = Operation {
    name: "Todos",
    field: "todos",
    document: r#"
query Todos($limit: Int, $sortBy: TodoSortByInput, $query: TodoQueryInput) {
  todos(limit: $limit, sortBy: $sortBy, query: $query) {
    _id
    title
    body
    completed
    priority
    createdAt
    updatedAt
  }
}
"#,
};

pub const INSERT_ONE_TODO: Operation = Operation {
    name: "InsertOneTodo",
    field: "insertOneTodo",
    document: r#"
mutation InsertOneTodo($data: TodoInsertInput!) {
  insertOneTodo(data: $data) {
    _id
  }
}
"#,
};

pub const UPDATE_ONE_TODO: Operation = Operation {
    name: "UpdateOneTodo",
    field: "updateOneTodo",
    document: r#"
mutation UpdateOneTodo($query: TodoQueryInput, $set: TodoUpdateInput!) {
  updateOneTodo(query: $query, set: $set) {
    _id
  }
}
"#,
};

pub const DELETE_ONE_TODO: Operation = Operation {
    name: "DeleteOneTodo",
    field: "deleteOneTodo",
    document: r#"
mutation DeleteOneTodo($query: TodoQueryInput!) {
  deleteOneTodo(query: $query) {
    _id
  }
}
"#,
};

pub const DELETE_MANY_TODOS: Operation = Operation {
    name: "DeleteManyTodos",
    field: "deleteManyTodos",
    document: r#"
mutation DeleteManyTodos($query: TodoQueryInput) {
  deleteManyTodos(query: $query) {
    deletedCount
  }
}
"#,
};
