//! Template bodies for the starter layout.

pub(crate) fn default_readme(name: &str) -> String {
    format!("# {}\n\nProject initialized with reposmith.\n", name)
}

pub(crate) const DOCS_INDEX: &str = "# Documentation\n\nProject documentation goes here.\n";

pub(crate) const CHANGELOG: &str = "\
# Changelog

All notable changes to this project will be documented in this file,
in reverse chronological order by release.

The format is based on [Keep a Changelog](https://keepachangelog.com),
and this project adheres to [Semantic Versioning](https://semver.org).

## [Unreleased]

### Added

### Changed

### Deprecated

### Removed

### Fixed
";

pub(crate) const CONTRIBUTING: &str = "\
# Contributing

Thank you for considering contributing to this project!

## How to Contribute

- Fork this repository
- Create a new branch
- Make your changes
- Submit a pull request

Please follow the coding conventions and include tests if applicable.
";

pub(crate) const CODE_OF_CONDUCT: &str = "\
# Code of Conduct

This project follows the [Contributor Covenant](https://www.contributor-covenant.org/)
Code of Conduct.

For any issues, please contact the maintainers.
";

pub(crate) const SECURITY: &str = "\
# Security Policy

If you discover a security vulnerability, please report it by contacting
the maintainers directly. Do not file public issues for security problems.
";

pub(crate) const ISSUE_TEMPLATE: &str = "\
<!-- Describe the bug or feature request here -->

**Steps to reproduce:**
1.
2.
3.

**Expected behavior:**

**Actual behavior:**
";

pub(crate) const PULL_REQUEST_TEMPLATE: &str = "\
<!-- Provide a general summary of your changes in the title above -->

## Description

## Related Issue

## Types of Changes

- [ ] Bug fix
- [ ] New feature
- [ ] Breaking change
- [ ] Documentation

## Checklist

- [ ] My code follows the code style of this project
- [ ] I have updated the documentation accordingly
";

pub(crate) const EDITORCONFIG: &str = "\
# EditorConfig helps maintain consistent coding styles
root = true

[*]
charset = utf-8
indent_style = space
indent_size = 2
end_of_line = lf
insert_final_newline = true
trim_trailing_whitespace = true
";

pub(crate) const GITATTRIBUTES: &str = "\
# Ensure consistent Git behavior
* text=auto
";
