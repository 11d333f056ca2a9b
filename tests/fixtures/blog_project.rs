//! Routes of a small blogging API.

#[abstract_router]
pub struct CrudRouter;

impl CrudRouter {
    #[get("/", "List all")]
    #[query("page", "number")]
    fn list(&self) {}

    #[get("/:id", "Fetch one")]
    #[param("id", "number")]
    fn show(&self) {}

    #[post("/", "Create")]
    fn create(&self) {}

    #[delete("/:id")]
    fn destroy(&self) {}
}

#[base_url("/users")]
#[extends(CrudRouter)]
pub struct Users;

impl Users {
    #[get("/", "List users")]
    #[response(200, "#/User[]", false, "Users")]
    fn list(&self) {}
}

#[base_url("/posts", related_to = Users, combiner = ":userId")]
pub struct Posts;

impl Posts {
    #[post("/", "Publish a post")]
    #[body("#/Post")]
    #[response(201, "#/Post", false, "Created")]
    fn create(&self) {}

    #[put("/:postId")]
    #[body(title = "string", tags = "string[]")]
    #[header("X-Request-Id", "string", true)]
    fn update(&self) {}
}

#[response_type]
pub struct User {
    id: u64,
    name: String,
    email: Option<String>,
}

#[response_type]
pub struct Post {
    id: u64,
    title: String,
    tags: Vec<String>,
    author: User,
}
