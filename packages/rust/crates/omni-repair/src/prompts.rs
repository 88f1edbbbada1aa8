//! Oracle prompt assembly (minijinja).
//!
//! Every file shown to the oracle is wrapped as
//!
//! ```text
//! ### File: {path} ###
//! ```python
//! {content}
//! ```
//! ```

use minijinja::{Environment, UndefinedBehavior, context};
use omni_ast::label_excerpt;
use omni_types::{EditLocation, LocationKind, Symbol};

use crate::resolver::LocationMap;

const FILE_BLOCK: &str = "file_block";
const FILE_LISTING: &str = "file_listing";
const ELEMENT_LISTING: &str = "element_listing";
const LINE_LEVEL: &str = "line_level";
const REPAIR: &str = "repair";

const FILE_BLOCK_TEMPLATE: &str = r"### File: {{ file }} ###
```python
{{ content }}
```";

const FILE_LISTING_TEMPLATE: &str = r"Please look through the following problem description and repository structure and list the files that one would need to edit to fix the problem.

### Problem Description ###
{{ problem }}

###

### Repository Structure ###
{{ structure }}

###

Please only provide the full path and return at most {{ max_files }} files.
The returned files should be separated by new lines, ordered by most to least important, and wrapped with ```
For example:
```
file1.py
file2.py
```";

const LOCATION_EXAMPLE: &str = r"```
full_path1/file1.py
function: my_function_1
class: MyClass1
function: MyClass2.my_method

full_path2/file2.py
variable: my_var
line: 24
```";

const ELEMENT_LISTING_TEMPLATE: &str = r"Please look through the following problem description and the skeleton of the relevant files.
Identify all locations that need inspection or editing to fix the problem, including directly related areas as well as any potentially related global variables, functions, and classes.
For each location, give the name of a class, of a method in a class, of a function, or of a global variable.

### Problem Description ###
{{ problem }}

### Skeleton of Relevant Files ###
{{ files }}

###

If you include a class, you do not need to list its methods.
### Examples:
{{ example }}

Return just the locations wrapped with ```.";

const LINE_LEVEL_TEMPLATE: &str = r"Please review the following problem description and relevant code, and provide the set of locations that need to be edited to fix the issue.
Locations can be class names, function or method names, or single line numbers.

### Problem Description ###
{{ problem }}

###
{{ files }}

###

### Examples:
{{ example }}

Return just the location(s) wrapped with ```.";

const REPAIR_TEMPLATE: &str = r"We are currently solving the following issue within our repository. Here is the issue text:
--- BEGIN ISSUE ---
{{ problem }}
--- END ISSUE ---

Please fix the following code sections:
--- BEGIN FILE ---
{{ files }}
--- END FILE ---

Please first localize the bug based on the issue statement, and then generate *SEARCH/REPLACE* edits to fix the issue.

Every *SEARCH/REPLACE* edit must use this format:
1. The file path
2. The start of search block: <<<<<<< SEARCH (line X-Y)
3. A contiguous chunk of lines to search for in the existing source code
4. The dividing line: =======
5. The lines to replace into the source code
6. The end of the replace block: >>>>>>> REPLACE

Here is an example:

```python
### mathweb/flask/app.py
<<<<<<< SEARCH (line 1-1)
from flask import Flask
=======
import math
from flask import Flask
>>>>>>> REPLACE
```

The *SEARCH/REPLACE* edit REQUIRES PROPER INDENTATION. If you would like to add the line '        print(x)', you must fully write that out, with all those spaces before the code!
Wrap each *SEARCH/REPLACE* edit in a ```python...``` block.";

/// Renders the oracle prompts.
#[derive(Debug)]
pub struct PromptBuilder {
    env: Environment<'static>,
    label_excerpts: bool,
}

impl PromptBuilder {
    /// Builder with every template registered.
    ///
    /// # Errors
    /// A template that fails to compile.
    pub fn new(label_excerpts: bool) -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template(FILE_BLOCK, FILE_BLOCK_TEMPLATE)?;
        env.add_template(FILE_LISTING, FILE_LISTING_TEMPLATE)?;
        env.add_template(ELEMENT_LISTING, ELEMENT_LISTING_TEMPLATE)?;
        env.add_template(LINE_LEVEL, LINE_LEVEL_TEMPLATE)?;
        env.add_template(REPAIR, REPAIR_TEMPLATE)?;
        Ok(Self {
            env,
            label_excerpts,
        })
    }

    /// One `### File: ... ###` block.
    ///
    /// # Errors
    /// Template rendering failure.
    pub fn file_block(&self, file: &str, content: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template(FILE_BLOCK)?
            .render(context! { file => file, content => content })
    }

    /// Ask for the files to edit, given a caller-supplied structure listing.
    ///
    /// # Errors
    /// Template rendering failure.
    pub fn file_listing(
        &self,
        problem: &str,
        structure: &str,
        max_files: usize,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template(FILE_LISTING)?.render(context! {
            problem => problem,
            structure => structure,
            max_files => max_files,
        })
    }

    /// Ask for the elements to inspect, given `(file, skeleton)` pairs.
    ///
    /// # Errors
    /// Template rendering failure.
    pub fn element_listing(
        &self,
        problem: &str,
        skeletons: &[(String, String)],
    ) -> Result<String, minijinja::Error> {
        let blocks = skeletons
            .iter()
            .map(|(file, skeleton)| self.file_block(file, skeleton))
            .collect::<Result<Vec<_>, _>>()?;
        self.env.get_template(ELEMENT_LISTING)?.render(context! {
            problem => problem,
            files => blocks.join("\n\n"),
            example => LOCATION_EXAMPLE,
        })
    }

    /// Ask for the precise locations to edit, given resolved excerpts.
    ///
    /// # Errors
    /// Template rendering failure.
    pub fn line_level(&self, problem: &str, map: &LocationMap) -> Result<String, minijinja::Error> {
        self.env.get_template(LINE_LEVEL)?.render(context! {
            problem => problem,
            files => self.location_blocks(map, "\n")?,
            example => LOCATION_EXAMPLE,
        })
    }

    /// Ask for SEARCH/REPLACE edits over the final locations.
    ///
    /// # Errors
    /// Template rendering failure.
    pub fn repair(&self, problem: &str, map: &LocationMap) -> Result<String, minijinja::Error> {
        self.env.get_template(REPAIR)?.render(context! {
            problem => problem,
            files => self.location_blocks(map, "\n\n")?,
        })
    }

    fn location_blocks(&self, map: &LocationMap, sep: &str) -> Result<String, minijinja::Error> {
        let blocks = map
            .iter()
            .map(|entry| {
                let sections: Vec<String> = entry
                    .locations
                    .iter()
                    .map(|loc| self.location_text(loc))
                    .collect();
                self.file_block(&entry.file, &sections.join(sep))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(blocks.join("\n\n"))
    }

    fn location_text(&self, location: &EditLocation) -> String {
        match &location.kind {
            LocationKind::NamedSymbol {
                kind,
                name,
                extracted_text,
            } if self.label_excerpts => {
                label_excerpt(&Symbol::new(*kind, name.clone()), extracted_text)
            }
            _ => location.extracted_text().to_string(),
        }
    }
}
