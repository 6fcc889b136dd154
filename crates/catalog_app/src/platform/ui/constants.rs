pub const BANNER: &str = "Catalog console. Type 'help' for commands.";

pub const PROGRESS_BAR_WIDTH: usize = 30;
pub const DESCRIPTION_WIDTH: usize = 40;

pub const HELP_TEXT: &str = "\
Import
  upload <path>                 upload a CSV file and follow the import
Products
  products                      reload the current page
  all                           clear filters and show page 1
  filter [sku=..] [name=..] [active=true|false]
  next | prev                   change page
  new-product                   start a new product
  edit <id>                     load a listed product into the form
  set <sku|name|description|active>=<value>
  save                          create or update the product in the form
  delete <id>                   delete one product
  delete-all                    delete every product
Webhooks
  webhooks                      reload the webhook list
  new-webhook                   start a new webhook
  edit-webhook <id>             load a listed webhook into the form
  set-webhook <url|event|enabled>=<value>
  save-webhook                  create or update the webhook in the form
  delete-webhook <id>           delete one webhook
  test-webhook <id>             fire a test delivery
Other
  yes | no                      answer a confirmation
  help                          show this text
  quit                          leave the console";
