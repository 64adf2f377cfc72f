//! Starter document templates
//!
//! Inserting a template replaces the whole buffer. `{date}` in a template
//! body is filled in with the date the template is rendered.

use chrono::{Local, NaiveDate};

/// A named starter document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    body: &'static str,
}

impl Template {
    /// Template text with `{date}` filled in from `date`.
    pub fn render(&self, date: NaiveDate) -> String {
        self.body
            .replace("{date}", &date.format("%Y-%m-%d").to_string())
    }

    /// Template text dated today.
    pub fn render_today(&self) -> String {
        self.render(Local::now().date_naive())
    }
}

/// All templates, in menu order.
pub fn templates() -> &'static [Template] {
    TEMPLATES
}

/// Look up a template by name (case-insensitive).
pub fn find_template(name: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

const TEMPLATES: &[Template] = &[
    Template {
        name: "Basic Document",
        body: r#"# Title

This is a basic markdown document.

## Subtitle

Write plain text here. Use **bold** or *italic* for emphasis.

### List

- First item
- Second item
- Third item

### Links and Images

[Link text](https://example.com)

![Image description](image.png)
"#,
    },
    Template {
        name: "README",
        body: r#"# Project Name

A short description of the project.

[TOC]

## Installation

```bash
cargo install project-name
```

## Usage

```rust
fn main() {
    project_name::run();
}
```

## Features

- Feature 1: description
- Feature 2: description

## Contributing

1. Fork the repository
2. Create a feature branch (`git checkout -b feature/amazing`)
3. Commit your changes
4. Open a pull request

## License

MIT License
"#,
    },
    Template {
        name: "Blog Post",
        body: r#"---
title: Post Title
date: {date}
author: Author
tags: [tag1, tag2]
---

# Post Title

![Cover image](cover.jpg)

## Introduction

Open with a paragraph that draws the reader in.

## Body

### First Section

Content goes here.

> Use a quote to highlight an important point.

### Second Section

## Conclusion

Wrap up here.

---

*Thanks for reading!*
"#,
    },
    Template {
        name: "Meeting Notes",
        body: r#"# Meeting Notes

**Date:** {date}
**Attendees:**
**Location:**

---

## Agenda

1. Project status
2. Next steps
3. Open issues

## Discussion

### Project status

- [x] Planning
- [x] Design
- [ ] Development
- [ ] Testing

### Next steps

| Owner | Task | Due |
| ----- | ---- | --- |
|       |      |     |

## Decisions

1.

## Next Meeting

**Date:**
"#,
    },
    Template {
        name: "Technical Document",
        body: r#"# API Reference

[TOC]

## Overview

This API manages user accounts.

## Authentication

Every request needs an API key:

```
Authorization: Bearer YOUR_API_KEY
```

## Endpoints

### Get a user

```http
GET /api/users/{id}
```

| Name | Type | Description |
| ---- | ---- | ----------- |
| id | string | User ID |

## Request Flow

```mermaid
sequenceDiagram
    Client->>API: GET /api/users/42
    API->>Database: lookup
    Database-->>API: row
    API-->>Client: 200 OK
```

## Error Codes

| Code | Meaning |
| ---- | ------- |
| 400 | Bad request |
| 401 | Unauthorized |
| 404 | Not found |
| 500 | Server error |
"#,
    },
    Template {
        name: "Checklist",
        body: r#"# Checklist

## Today

- [ ] Check email
- [ ] Attend meeting
- [ ] Write report

## This Week

- [ ] Finish project A
  - [ ] Implement feature 1
  - [ ] Write tests
- [ ] Start project B

## Done

- [x] Environment setup
"#,
    },
    Template {
        name: "Diagram",
        body: r#"# Diagram

```mermaid
flowchart TD
    Start --> Decision{Ready?}
    Decision -->|Yes| Ship
    Decision -->|No| Fix
    Fix --> Decision
```
"#,
    },
];

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
