pub type ListInputItemsResponse = crate::openai::list_response_items::ResponseItemList;
