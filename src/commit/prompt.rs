//! Prompt construction for AI-generated commit messages.

use crate::config::Language;

/// Conventional Commits types the model may use.
pub const COMMIT_TYPES: [&str; 8] = [
    "feat", "fix", "docs", "style", "refactor", "test", "chore", "perf",
];

/// The description after `type(scope): ` must stay under this many characters.
pub const MAX_DESCRIPTION_CHARS: usize = 80;

/// Build the prompt for generating a commit message from a staged diff.
///
/// Deterministic: the same diff and language always yield the same text.
pub fn build_commit_prompt(diff: &str, language: Language) -> String {
    let instructions = match language {
        Language::PortugueseBrazil => portuguese_instructions(),
        Language::English => english_instructions(),
    };
    let lead_in = match language {
        Language::PortugueseBrazil => "Dado o seguinte diff do git, gere a mensagem de commit:",
        Language::English => "Given the following git diff, write the commit message:",
    };

    format!("{instructions}\n{lead_in}\n\n{diff}")
}

fn portuguese_instructions() -> String {
    format!(
        r#"Você é uma IA especializada em gerar mensagens de commit em português do Brasil, seguindo o padrão Conventional Commits. Sua tarefa é criar mensagens curtas, claras e concisas, que descrevam a finalidade da alteração no código.

## Regras obrigatórias
- A mensagem de commit deve seguir este formato: `<tipo>(<escopo opcional>): <descrição>`
- Use um dos seguintes tipos no início da mensagem:
  - feat: nova funcionalidade.
  - fix: correção de bug.
  - docs: alteração na documentação.
  - style: mudanças de formatação (semântica intacta).
  - refactor: refatoração sem mudança de comportamento.
  - test: adição ou modificação de testes.
  - chore: tarefas de manutenção (build, dependências, etc.).
  - perf: melhorias de performance.
- Escreva apenas uma linha.
- Use sempre o imperativo presente (ex: "adiciona suporte a X", "corrige erro em Y").
- A descrição deve ter menos de {max} caracteres.
- Foque no propósito da mudança, não nos detalhes técnicos.
- O escopo é opcional, mas pode ser incluído entre parênteses após o tipo (ex: feat(api): adiciona autenticação JWT).

## Evite
- Mensagens com mais de uma linha.
- Listar arquivos, funções, classes ou outros identificadores modificados.
- Incluir datas, nomes de pessoas ou números de tickets.
- Formatação markdown.

## Formato de saída
Responda somente com um objeto JSON: {{"commitMessage": "<mensagem>"}}
"#,
        max = MAX_DESCRIPTION_CHARS
    )
}

fn english_instructions() -> String {
    format!(
        r#"You are an AI that writes commit messages in English following the Conventional Commits standard. Your task is to write short, clear and concise messages that describe the purpose of the code change.

## Required rules
- The commit message must follow this format: `<type>(<optional scope>): <description>`
- Start the message with one of these types:
  - feat: a new feature.
  - fix: a bug fix.
  - docs: documentation changes.
  - style: formatting changes (meaning unchanged).
  - refactor: restructuring without behavior change.
  - test: adding or changing tests.
  - chore: maintenance tasks (build, dependencies, etc.).
  - perf: performance improvements.
- Write exactly one line.
- Always use the imperative present mood (e.g. "add support for X", "fix error in Y").
- Keep the description under {max} characters.
- Focus on the purpose of the change, not the technical details.
- The scope is optional but may follow the type in parentheses (e.g. feat(api): add JWT authentication).

## Avoid
- Messages longer than one line.
- Listing modified files, functions, classes or other identifiers.
- Dates, personal names or ticket numbers.
- Markdown formatting.

## Output format
Respond only with a JSON object: {{"commitMessage": "<message>"}}
"#,
        max = MAX_DESCRIPTION_CHARS
    )
}
