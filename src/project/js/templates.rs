// src/project/js/templates.rs

//! Sources of the files scaffolded for JS projects.

pub const BABEL: &str = r#"module.exports = {
  presets: [
    ["@babel/preset-env", { targets: { node: "current" } }],
    "@babel/preset-typescript",
  ],
};
"#;

pub const TSCONFIG: &str = r#"{
  "compilerOptions": {
    "target": "es2019",
    "module": "esnext",
    "moduleResolution": "node",
    "strict": true,
    "esModuleInterop": true,
    "skipLibCheck": true,
    "sourceMap": true,
    "baseUrl": "."
  },
  "include": ["src/**/*.ts", "src/**/*.tsx", "src/**/*.vue"],
  "exclude": ["node_modules"]
}
"#;

pub const ESLINT: &str = r#"root: true
env:
  browser: true
  es2021: true
  node: true
extends:
  - eslint:recommended
  - plugin:@typescript-eslint/recommended
parser: "@typescript-eslint/parser"
parserOptions:
  ecmaVersion: 12
  sourceType: module
plugins:
  - "@typescript-eslint"
rules: {}
"#;

pub const JEST: &str = r#"module.exports = {
  testEnvironment: "jsdom",
  transform: {
    "^.+\\.[jt]sx?$": "babel-jest",
  },
  moduleFileExtensions: ["ts", "tsx", "js", "json"],
  collectCoverage: true,
  coverageDirectory: "coverage",
};
"#;

pub const GO_EMBED: &str = r#"// Package {{ package }} embeds the {{ project }} frontend build.
package {{ package }}

import "embed"

// Dist holds the compiled frontend assets.
//
//go:embed dist
var Dist embed.FS
"#;
