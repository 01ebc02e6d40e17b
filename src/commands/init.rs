//! Initialize a new site

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# Site
title: My Blog
description: ''
author: ''
language: en
url: http://localhost:8080

# Directory
dir:
  input: src
  output: _site
  includes: _includes
posts_glob: posts/**/*.md
post_tag: posts
passthrough:
  - assets
  - favicon.ico

# Writing
excerpt_length: 200
markdown:
  html: true
  breaks: true
  linkify: true
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false

# Feed
feed:
  enable: true
  path: feed.xml
  limit: 20

# Appearance
theme:
  prefers_dark: false

# URL
category_dir: categories
tag_dir: tags
"#;

const POST_SCAFFOLD: &str = r#"---
title: "{{ title }}"
date: {{ date }}
categories: []
tags: []
---
"#;

const ABOUT_PAGE: &str = r#"---
title: About
---

Write something about yourself here.
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    fs::create_dir_all(target_dir.join("src/posts"))?;
    fs::create_dir_all(target_dir.join("src/_includes"))?;
    fs::create_dir_all(target_dir.join("src/assets"))?;
    fs::create_dir_all(target_dir.join("scaffolds"))?;

    fs::write(&config_path, CONFIG_TEMPLATE)?;
    fs::write(target_dir.join("scaffolds/post.md"), POST_SCAFFOLD)?;
    fs::write(target_dir.join("src/about.md"), ABOUT_PAGE)?;

    let today = Utc::now().format("%Y-%m-%d").to_string();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
categories: [general]
tags: [welcome]
---

Welcome to your new blog! This is your very first post.

## Quick Start

### Create a new post

```bash
$ quire new "My New Post"
```

### Run server

```bash
$ quire serve
```

### Build static files

```bash
$ quire build
```
"#,
        today
    );
    fs::write(
        target_dir.join(format!("src/posts/{}-hello-world.md", today)),
        sample_post,
    )?;

    tracing::debug!("Scaffolded site in {:?}", target_dir);
    Ok(())
}
