// handlers/protected/mod.rs - Protected handlers (permission required)
//
// Security Level: bearer token carrying the route's permission
// Middleware: `require_permission` injects the verified `Claims`
//
// | Route                | Permission          |
// |----------------------|---------------------|
// | GET /drinks-detail   | get:drinks-detail   |
// | POST /drinks         | post:drinks         |
// | PATCH /drinks/:id    | patch:drinks        |
// | DELETE /drinks/:id   | delete:drinks       |

pub mod drinks;

pub use drinks::create as drinks_create;
pub use drinks::delete as drinks_delete;
pub use drinks::detail as drinks_detail;
pub use drinks::update as drinks_update;
